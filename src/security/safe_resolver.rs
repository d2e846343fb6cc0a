//! SSRF-safe connect-time DNS resolver for reqwest.
//!
//! The DNS guard checks a hostname before the lookup starts, but the transport
//! resolves the name again when it connects. Installing this resolver on the
//! reqwest client drops private, loopback and link-local answers at that
//! second resolution too, so a rebinding DNS server cannot swap in an internal
//! address between the check and the connection.

use std::net::SocketAddr;

use reqwest::dns::{Addrs, Name, Resolve, Resolving};

use crate::security::is_private_ip;

/// A DNS resolver that never hands private addresses to the connector.
#[derive(Debug, Clone, Default)]
pub struct PublicOnlyResolver;

impl Resolve for PublicOnlyResolver {
    fn resolve(&self, name: Name) -> Resolving {
        Box::pin(async move {
            let host = format!("{}:0", name.as_str());
            let addrs: Vec<SocketAddr> = tokio::net::lookup_host(&host)
                .await
                .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> { Box::new(e) })?
                .collect();

            let public: Vec<SocketAddr> = filter_public(addrs);
            if public.is_empty() {
                return Err(Box::new(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    format!(
                        "SSRF blocked: all resolved addresses for '{}' are private or reserved",
                        name.as_str()
                    ),
                ))
                    as Box<dyn std::error::Error + Send + Sync>);
            }

            let addrs: Addrs = Box::new(public.into_iter());
            Ok(addrs)
        })
    }
}

fn filter_public(addrs: Vec<SocketAddr>) -> Vec<SocketAddr> {
    addrs
        .into_iter()
        .filter(|addr| !is_private_ip(addr.ip()))
        .collect()
}
