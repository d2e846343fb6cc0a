//! Network access.
//!
//! - [`Transport`]: the injected single-request GET capability (reqwest by default)
//! - [`RedirectSafeFetcher`]: manual redirect following with per-hop SSRF checks,
//!   status mapping and JSON validation

mod redirects;
mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use redirects::RedirectSafeFetcher;
pub use transport::{ReqwestTransport, Transport, TransportResponse};

pub(crate) use redirects::authority;
