//! DNS resolver initialization.

use std::sync::Arc;
use std::time::Duration;

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;

use crate::config::{DNS_ATTEMPTS, DNS_TIMEOUT_SECS};
use crate::security::{DnsResolver, HickoryDnsResolver};

/// Builds the resolver used by the DNS resolution guard.
///
/// Uses the default upstream configuration with short timeouts, so a slow
/// DNS server delays a lookup by seconds rather than stalling it. `ndots` is
/// 0 so no search domain is ever appended to the checked hostname.
pub fn init_resolver() -> Arc<dyn DnsResolver> {
    let mut opts = ResolverOpts::default();
    opts.timeout = Duration::from_secs(DNS_TIMEOUT_SECS);
    opts.attempts = DNS_ATTEMPTS;
    opts.ndots = 0;

    let resolver = TokioAsyncResolver::tokio(ResolverConfig::default(), opts);
    Arc::new(HickoryDnsResolver::new(Arc::new(resolver)))
}
