//! webfinger_client library: WebFinger (RFC 7033) lookups that are safe to run
//! against untrusted hosts.
//!
//! A lookup resolves a user address (`user@host`) or URI to the links and
//! properties its server publishes. The target host is caller supplied, so
//! every host the client dereferences (the initial endpoint, fallback
//! endpoints, redirect targets, relay links) is sanitized and classified
//! first, and requests to private or internal addresses are refused unless
//! explicitly allowed.
//!
//! # Example
//!
//! ```no_run
//! use webfinger_client::{Config, WebFinger};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let webfinger = WebFinger::new(Config {
//!     uri_fallback: true,
//!     ..Default::default()
//! })?;
//!
//! let blog = webfinger.lookup_link("nick@silverbucket.net", "blog").await?;
//! println!("{}", blog.href);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

mod address;
mod cascade;
mod client;
pub mod config;
mod error_handling;
mod fetch;
pub mod initialization;
mod jrd;
pub mod security;

// Re-export public API
pub use address::{parse_address, ParsedAddress};
pub use client::WebFinger;
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{
    DnsLookupError, ErrorKind, InitializationError, TransportError, WebFingerError,
};
pub use fetch::{ReqwestTransport, Transport, TransportResponse};
pub use jrd::{
    process as process_jrd, IndexProperties, Jrd, JrdIndex, LinkObject, LinkRelation,
    WebFingerResult, RELATION_MAP,
};
pub use security::{DnsResolver, HickoryDnsResolver};
