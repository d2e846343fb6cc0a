//! Endpoint fallback cascade.
//!
//! One lookup walks the well-known endpoints, then optionally retries over
//! plain http, then optionally asks the deprecated WebFist relay. Only
//! retryable errors (protocol and transport failures of the fetch) move the
//! cascade forward; everything else ends the lookup.

mod state;

use log::{debug, warn};
use url::Url;

use crate::address::ParsedAddress;
use crate::config::Config;
use crate::error_handling::WebFingerError;
use crate::fetch::{authority, RedirectSafeFetcher};
use crate::jrd::{process, LinkRelation, WebFingerResult};
use crate::security::{is_private_address, sanitize_host, DnsResolutionGuard};

use state::{next_transition, CascadeState, Transition};

/// Drives one lookup through the fallback stages.
pub(crate) struct EndpointCascade<'a> {
    pub(crate) config: &'a Config,
    pub(crate) fetcher: &'a RedirectSafeFetcher,
    pub(crate) dns_guard: &'a DnsResolutionGuard,
}

impl EndpointCascade<'_> {
    /// Runs the cascade for an already validated host.
    pub(crate) async fn run(
        &self,
        address: &ParsedAddress,
        host: String,
    ) -> Result<WebFingerResult, WebFingerError> {
        let resource = address.resource();
        let mut state = CascadeState::new(host);

        loop {
            let url = state.url(&resource)?;
            let error = match self.fetcher.fetch(&url).await {
                Ok(body) => return process(&body),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => e,
            };

            let transition = next_transition(self.config, &state);
            debug!("Lookup of {url} failed ({error}); next stage: {transition:?}");
            match transition {
                Transition::Fail => return Err(error),
                Transition::LegacyRelay => {
                    state.apply(transition);
                    return self.relay_lookup(&state, &resource, error).await;
                }
                _ => state.apply(transition),
            }
        }
    }

    /// Two hops: the relay's JRD names where the real JRD lives.
    ///
    /// If the relay knows nothing about the resource, the error of the direct
    /// lookup is returned.
    async fn relay_lookup(
        &self,
        state: &CascadeState,
        resource: &str,
        direct_error: WebFingerError,
    ) -> Result<WebFingerResult, WebFingerError> {
        warn!(
            "WebFist fallback is deprecated and will be removed; querying {} for {resource}",
            state.host
        );

        let relay_url = state.url(resource)?;
        let relay = process(&self.fetcher.fetch(&relay_url).await?)?;
        let Some(link) = relay.index.links(LinkRelation::Webfist).first() else {
            debug!("Relay has no entry for {resource}");
            return Err(direct_error);
        };

        let target = self.validate_relay_link(&link.href).await?;
        debug!("Relay points {resource} at {target}");
        process(&self.fetcher.fetch(&target).await?)
    }

    async fn validate_relay_link(&self, href: &str) -> Result<Url, WebFingerError> {
        let invalid = || WebFingerError::security("invalid relay link");
        let url = Url::parse(href).map_err(|_| invalid())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid());
        }

        let host = sanitize_host(&authority(&url).map_err(|_| invalid())?)?;
        if !self.config.allow_private_addresses {
            if is_private_address(&host)? {
                return Err(WebFingerError::security(
                    "relay link to private or internal address blocked",
                ));
            }
            self.dns_guard.validate(&host).await?;
        }
        Ok(url)
    }
}
