//! Per-lookup cascade state and its transitions.

use url::Url;

use crate::config::{Config, ENDPOINTS, LEGACY_RELAY_HOST};
use crate::error_handling::WebFingerError;
use crate::security::is_localhost;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Protocol {
    Https,
    Http,
}

impl Protocol {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Protocol::Https => "https",
            Protocol::Http => "http",
        }
    }
}

/// What to do after an attempt failed with a retryable error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    /// Same protocol and host, next well-known endpoint
    NextEndpoint,
    /// First endpoint again over plain http
    HttpDowngrade,
    /// Ask the legacy relay host instead
    LegacyRelay,
    /// Surface the error
    Fail,
}

/// Mutable record of one lookup's progress. Never shared between lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CascadeState {
    pub(crate) endpoint_index: usize,
    pub(crate) protocol: Protocol,
    pub(crate) host: String,
}

impl CascadeState {
    /// Starts at the first endpoint; localhost targets start on http.
    pub(crate) fn new(host: String) -> Self {
        let protocol = if is_localhost(&host) {
            Protocol::Http
        } else {
            Protocol::Https
        };
        Self {
            endpoint_index: 0,
            protocol,
            host,
        }
    }

    pub(crate) fn endpoint(&self) -> &'static str {
        ENDPOINTS[self.endpoint_index]
    }

    pub(crate) fn is_relay_host(&self) -> bool {
        self.host == LEGACY_RELAY_HOST
    }

    /// `{protocol}://{host}/.well-known/{endpoint}?resource={resource}`
    ///
    /// The resource is form-encoded. Bare IPv6 literals are bracketed.
    pub(crate) fn url(&self, resource: &str) -> Result<Url, WebFingerError> {
        let host = if self.host.matches(':').count() > 1 && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        let mut url = Url::parse(&format!(
            "{}://{}/.well-known/{}",
            self.protocol.as_str(),
            host,
            self.endpoint()
        ))
        .map_err(|_| WebFingerError::validation("invalid host format"))?;
        url.query_pairs_mut().append_pair("resource", resource);
        Ok(url)
    }

    pub(crate) fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::NextEndpoint => self.endpoint_index += 1,
            Transition::HttpDowngrade => {
                self.endpoint_index = 0;
                self.protocol = Protocol::Http;
            }
            Transition::LegacyRelay => {
                self.endpoint_index = 0;
                self.protocol = Protocol::Http;
                self.host = LEGACY_RELAY_HOST.to_string();
            }
            Transition::Fail => {}
        }
    }
}

/// Picks the next stage. Stages are checked strictly in order.
pub(crate) fn next_transition(config: &Config, state: &CascadeState) -> Transition {
    if config.uri_fallback && !state.is_relay_host() && state.endpoint_index < ENDPOINTS.len() - 1
    {
        Transition::NextEndpoint
    } else if !config.tls_only && state.protocol == Protocol::Https {
        Transition::HttpDowngrade
    } else if config.webfist_fallback && !state.is_relay_host() {
        Transition::LegacyRelay
    } else {
        Transition::Fail
    }
}
