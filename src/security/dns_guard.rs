//! DNS resolution guard.
//!
//! A public-looking hostname can resolve to a private address
//! (`internal.attacker.example -> 10.0.0.5`). When a resolver is available the
//! guard resolves A and AAAA records up front and refuses hosts whose records
//! point inside the private ranges. Resolver failures are logged and ignored:
//! only a positive "resolves to private" finding blocks a lookup.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

use futures::future::BoxFuture;
use hickory_resolver::TokioAsyncResolver;
use log::{debug, warn};
use url::Host;

use crate::error_handling::{DnsLookupError, WebFingerError};
use crate::security::{is_private_address, is_private_ip, parse_host, strip_port};

/// Forward DNS capability (A and AAAA lookups).
///
/// Injected into [`crate::WebFinger`]; environments without DNS access simply
/// construct the client without one.
pub trait DnsResolver: Send + Sync {
    /// Resolves the A records of `host`.
    fn lookup_ipv4<'a>(&'a self, host: &'a str)
        -> BoxFuture<'a, Result<Vec<Ipv4Addr>, DnsLookupError>>;

    /// Resolves the AAAA records of `host`.
    fn lookup_ipv6<'a>(&'a self, host: &'a str)
        -> BoxFuture<'a, Result<Vec<Ipv6Addr>, DnsLookupError>>;
}

/// [`DnsResolver`] backed by `hickory-resolver`.
pub struct HickoryDnsResolver {
    resolver: Arc<TokioAsyncResolver>,
}

impl HickoryDnsResolver {
    pub fn new(resolver: Arc<TokioAsyncResolver>) -> Self {
        Self { resolver }
    }
}

impl DnsResolver for HickoryDnsResolver {
    fn lookup_ipv4<'a>(
        &'a self,
        host: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Ipv4Addr>, DnsLookupError>> {
        Box::pin(async move {
            let response = self
                .resolver
                .ipv4_lookup(host)
                .await
                .map_err(|e| lookup_error(host, e))?;
            Ok(response.iter().map(|record| record.0).collect())
        })
    }

    fn lookup_ipv6<'a>(
        &'a self,
        host: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Ipv6Addr>, DnsLookupError>> {
        Box::pin(async move {
            let response = self
                .resolver
                .ipv6_lookup(host)
                .await
                .map_err(|e| lookup_error(host, e))?;
            Ok(response.iter().map(|record| record.0).collect())
        })
    }
}

fn lookup_error(host: &str, e: impl std::fmt::Display) -> DnsLookupError {
    DnsLookupError {
        host: host.to_string(),
        message: e.to_string(),
    }
}

/// Re-applies the private address classifier to DNS answers.
#[derive(Clone, Default)]
pub struct DnsResolutionGuard {
    resolver: Option<Arc<dyn DnsResolver>>,
}

impl DnsResolutionGuard {
    pub fn new(resolver: Option<Arc<dyn DnsResolver>>) -> Self {
        Self { resolver }
    }

    /// Whether a resolver capability is installed.
    pub fn is_enabled(&self) -> bool {
        self.resolver.is_some()
    }

    /// Validates a sanitized host (optionally with port).
    ///
    /// IP literals and localhost names are skipped, since the literal
    /// classifier already decided them.
    ///
    /// # Errors
    ///
    /// - `WebFingerError::Security` when any A or AAAA record is private
    /// - `WebFingerError::Validation` when the host itself is malformed
    pub async fn validate(&self, host: &str) -> Result<(), WebFingerError> {
        let Some(resolver) = &self.resolver else {
            return Ok(());
        };

        let hostname = match parse_host(strip_port(host)?)? {
            Host::Domain(domain) => domain,
            Host::Ipv4(_) | Host::Ipv6(_) => return Ok(()),
        };
        if is_private_address(&hostname)? {
            return Ok(());
        }

        let mut resolved: Vec<IpAddr> = Vec::new();
        match resolver.lookup_ipv4(&hostname).await {
            Ok(addrs) => resolved.extend(addrs.into_iter().map(IpAddr::V4)),
            Err(e) => warn!("Ignoring DNS failure during SSRF check: {e}"),
        }
        match resolver.lookup_ipv6(&hostname).await {
            Ok(addrs) => resolved.extend(addrs.into_iter().map(IpAddr::V6)),
            Err(e) => warn!("Ignoring DNS failure during SSRF check: {e}"),
        }

        if let Some(ip) = resolved.iter().find(|ip| is_private_ip(**ip)) {
            return Err(WebFingerError::security(format!(
                "hostname {hostname} resolves to private address {ip}"
            )));
        }

        debug!(
            "DNS check passed for {hostname} ({} addresses)",
            resolved.len()
        );
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory resolver for tests. Unknown hosts fail like NXDOMAIN.
    #[derive(Default)]
    pub(crate) struct StaticResolver {
        pub(crate) v4: HashMap<String, Vec<Ipv4Addr>>,
        pub(crate) v6: HashMap<String, Vec<Ipv6Addr>>,
        pub(crate) queries: Mutex<Vec<String>>,
    }

    impl StaticResolver {
        pub(crate) fn with_v4(host: &str, addrs: &[Ipv4Addr]) -> Self {
            let mut resolver = Self::default();
            resolver.v4.insert(host.to_string(), addrs.to_vec());
            resolver
        }

        pub(crate) fn queried(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    impl DnsResolver for StaticResolver {
        fn lookup_ipv4<'a>(
            &'a self,
            host: &'a str,
        ) -> BoxFuture<'a, Result<Vec<Ipv4Addr>, DnsLookupError>> {
            Box::pin(async move {
                self.queries.lock().unwrap().push(host.to_string());
                self.v4
                    .get(host)
                    .cloned()
                    .ok_or_else(|| lookup_error(host, "NXDOMAIN"))
            })
        }

        fn lookup_ipv6<'a>(
            &'a self,
            host: &'a str,
        ) -> BoxFuture<'a, Result<Vec<Ipv6Addr>, DnsLookupError>> {
            Box::pin(async move {
                self.v6
                    .get(host)
                    .cloned()
                    .ok_or_else(|| lookup_error(host, "NXDOMAIN"))
            })
        }
    }

    fn guard(resolver: StaticResolver) -> (DnsResolutionGuard, Arc<StaticResolver>) {
        let resolver = Arc::new(resolver);
        let guard = DnsResolutionGuard::new(Some(resolver.clone() as Arc<dyn DnsResolver>));
        (guard, resolver)
    }

    #[tokio::test]
    async fn test_blocks_public_name_resolving_to_private_ipv4() {
        let (guard, resolver) = guard(StaticResolver::with_v4(
            "malicious-domain.com",
            &[Ipv4Addr::new(127, 0, 0, 1)],
        ));
        let err = guard.validate("malicious-domain.com").await.unwrap_err();
        assert!(matches!(err, WebFingerError::Security(_)));
        assert!(err.to_string().contains("resolves to private address"));
        assert!(err.to_string().contains("malicious-domain.com"));
        assert!(err.to_string().contains("127.0.0.1"));
        assert_eq!(resolver.queried(), vec!["malicious-domain.com".to_string()]);
    }

    #[tokio::test]
    async fn test_blocks_private_ipv6_answer() {
        let mut resolver = StaticResolver::with_v4("mixed.example", &[Ipv4Addr::new(93, 184, 216, 34)]);
        resolver.v6.insert(
            "mixed.example".to_string(),
            vec![Ipv6Addr::new(0xfd00, 0, 0, 0, 0, 0, 0, 1)],
        );
        let (guard, _) = guard(resolver);
        let err = guard.validate("mixed.example:8443").await.unwrap_err();
        assert!(err.to_string().contains("fd00::1"));
    }

    #[tokio::test]
    async fn test_allows_public_answers() {
        let (guard, _) = guard(StaticResolver::with_v4(
            "example.com",
            &[Ipv4Addr::new(93, 184, 216, 34)],
        ));
        assert!(guard.validate("example.com").await.is_ok());
    }

    #[tokio::test]
    async fn test_resolver_failures_are_not_fatal() {
        let (guard, resolver) = guard(StaticResolver::default());
        assert!(guard.validate("does-not-exist.example").await.is_ok());
        assert_eq!(resolver.queried().len(), 1);
    }

    #[tokio::test]
    async fn test_skips_ip_literals_and_localhost() {
        let (guard, resolver) = guard(StaticResolver::default());
        assert!(guard.validate("127.0.0.1").await.is_ok());
        assert!(guard.validate("[2001:db8::1]:443").await.is_ok());
        assert!(guard.validate("localhost:8080").await.is_ok());
        assert!(resolver.queried().is_empty());
    }

    #[tokio::test]
    async fn test_disabled_without_resolver() {
        let guard = DnsResolutionGuard::default();
        assert!(!guard.is_enabled());
        assert!(guard.validate("anything.example").await.is_ok());
    }
}
