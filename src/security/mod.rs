//! SSRF protection.
//!
//! Everything the client dereferences is checked here first:
//! - host sanitization and private/internal address classification
//! - DNS answers for public-looking names (optional resolver capability)
//! - connect-time filtering of DNS answers inside the HTTP transport

mod dns_guard;
mod host_validation;
mod safe_resolver;

pub use dns_guard::{DnsResolutionGuard, DnsResolver, HickoryDnsResolver};
pub use host_validation::{is_localhost, is_private_address, is_private_ip, sanitize_host};
pub use safe_resolver::PublicOnlyResolver;

pub(crate) use host_validation::{parse_host, strip_port};

#[cfg(test)]
pub(crate) use dns_guard::tests::StaticResolver;
