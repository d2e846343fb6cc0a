//! JRD documents and their indexed form.

mod normalize;
mod types;

pub use normalize::process;
pub use types::{
    IndexProperties, Jrd, JrdIndex, LinkObject, LinkRelation, WebFingerResult, RELATION_MAP,
};
