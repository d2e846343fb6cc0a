//! The public WebFinger client.

use std::str::FromStr;
use std::sync::Arc;

use log::debug;

use crate::address::parse_address;
use crate::cascade::EndpointCascade;
use crate::config::Config;
use crate::error_handling::{InitializationError, WebFingerError};
use crate::fetch::{RedirectSafeFetcher, Transport};
use crate::initialization::{init_resolver, init_transport};
use crate::jrd::{LinkObject, LinkRelation, WebFingerResult};
use crate::security::{is_private_address, sanitize_host, DnsResolutionGuard, DnsResolver};

/// WebFinger client.
///
/// Holds only immutable configuration and shared capabilities, so one
/// instance can serve concurrent lookups.
///
/// # Examples
///
/// ```no_run
/// use webfinger_client::{Config, LinkRelation, WebFinger};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let webfinger = WebFinger::new(Config::default())?;
/// let result = webfinger.lookup("nick@silverbucket.net").await?;
/// for link in result.index.links(LinkRelation::Avatar) {
///     println!("{}", link.href);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct WebFinger {
    config: Config,
    fetcher: RedirectSafeFetcher,
    dns_guard: DnsResolutionGuard,
}

impl WebFinger {
    /// Creates a client with the default reqwest transport and hickory DNS resolver.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self, InitializationError> {
        let transport = init_transport(&config)?;
        Ok(Self::with_capabilities(
            config,
            transport,
            Some(init_resolver()),
        ))
    }

    /// Creates a client from explicit capabilities.
    ///
    /// Without a DNS resolver, hostnames are only classified literally.
    pub fn with_capabilities(
        config: Config,
        transport: Arc<dyn Transport>,
        dns: Option<Arc<dyn DnsResolver>>,
    ) -> Self {
        let dns_guard = DnsResolutionGuard::new(dns);
        let fetcher = RedirectSafeFetcher::new(
            transport,
            dns_guard.clone(),
            config.allow_private_addresses,
            config.max_response_bytes,
        );
        Self {
            config,
            fetcher,
            dns_guard,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Looks up a user address (`user@host`, `acct:user@host`) or URI.
    ///
    /// The host is sanitized and classified before any request is made.
    ///
    /// # Errors
    ///
    /// - `Validation`: empty or malformed address, malformed host
    /// - `Security`: private or internal target, private DNS answers,
    ///   rejected redirects
    /// - `Protocol`: the last endpoint's status, JSON or JRD error once the
    ///   enabled fallbacks are exhausted
    /// - `Unknown`: transport failure of the last attempt
    pub async fn lookup(&self, address: &str) -> Result<WebFingerResult, WebFingerError> {
        let parsed = parse_address(address)?;
        let host = sanitize_host(&parsed.host)?;

        let private = is_private_address(&host)?;
        if !self.config.allow_private_addresses {
            if private {
                return Err(WebFingerError::security(
                    "private or internal addresses are not allowed",
                ));
            }
            self.dns_guard.validate(&host).await?;
        }

        debug!("Looking up {} on {host}", parsed.resource());
        EndpointCascade {
            config: &self.config,
            fetcher: &self.fetcher,
            dns_guard: &self.dns_guard,
        }
        .run(&parsed, host)
        .await
    }

    /// Returns the first link of a relation category (`avatar`, `blog`, ...).
    ///
    /// # Errors
    ///
    /// - `unsupported rel {rel}` when `rel` is not a known category (no request is made)
    /// - `no links found with rel="{rel}"` when the category is empty
    /// - any error of [`WebFinger::lookup`]
    pub async fn lookup_link(&self, address: &str, rel: &str) -> Result<LinkObject, WebFingerError> {
        let relation = LinkRelation::from_str(rel)
            .map_err(|_| WebFingerError::validation(format!("unsupported rel {rel}")))?;

        let result = self.lookup(address).await?;
        result
            .index
            .links(relation)
            .first()
            .cloned()
            .ok_or_else(|| WebFingerError::protocol(format!("no links found with rel=\"{rel}\"")))
    }
}
