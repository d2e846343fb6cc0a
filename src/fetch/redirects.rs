//! Redirect-safe JRD fetching.
//!
//! Redirects are followed manually, one hop at a time, so that every
//! destination is sanitized and classified before it is requested. The chain
//! is capped at [`MAX_REDIRECTS`] hops.

use std::sync::Arc;

use log::{debug, info, warn};
use url::Url;

use crate::config::{JRD_MEDIA_TYPE, JSON_MEDIA_TYPE, MAX_REDIRECTS};
use crate::error_handling::WebFingerError;
use crate::fetch::transport::Transport;
use crate::security::{is_private_address, sanitize_host, DnsResolutionGuard};

/// Fetches JRD text, re-validating each redirect target.
#[derive(Clone)]
pub struct RedirectSafeFetcher {
    transport: Arc<dyn Transport>,
    dns_guard: DnsResolutionGuard,
    allow_private_addresses: bool,
    max_response_bytes: usize,
}

impl RedirectSafeFetcher {
    pub fn new(
        transport: Arc<dyn Transport>,
        dns_guard: DnsResolutionGuard,
        allow_private_addresses: bool,
        max_response_bytes: usize,
    ) -> Self {
        Self {
            transport,
            dns_guard,
            allow_private_addresses,
            max_response_bytes,
        }
    }

    /// Fetches `url` and returns the response body once it is known to be JSON.
    ///
    /// # Errors
    ///
    /// Security errors (never retried by the cascade):
    /// - `too many redirects` after more than [`MAX_REDIRECTS`] hops
    /// - `redirect without location header`
    /// - `invalid redirect URL` when `Location` does not resolve to an http(s) URL
    /// - `redirect to private or internal address blocked`
    /// - DNS guard findings for the redirect host
    ///
    /// Protocol errors: `resource not found` (404), `error during request`
    /// (other non-2xx), `response too large`, `invalid json`.
    ///
    /// Transport failures surface as `WebFingerError::Unknown`.
    pub async fn fetch(&self, url: &Url) -> Result<String, WebFingerError> {
        let mut current = url.clone();
        let mut redirect_count = 0usize;

        loop {
            if redirect_count > MAX_REDIRECTS {
                return Err(WebFingerError::security("too many redirects"));
            }

            debug!("Requesting {current}");
            let response = self.transport.get(&current).await?;

            if (300..400).contains(&response.status) {
                let location = response
                    .location
                    .ok_or_else(|| WebFingerError::security("redirect without location header"))?;
                let next = self.validate_redirect(&current, &location).await?;
                debug!(
                    "Following redirect {} -> {} (status {})",
                    current, next, response.status
                );
                current = next;
                redirect_count += 1;
                continue;
            }

            if response.status == 404 {
                return Err(WebFingerError::protocol_status("resource not found", 404));
            }
            if !(200..300).contains(&response.status) {
                return Err(WebFingerError::protocol_status(
                    "error during request",
                    response.status,
                ));
            }

            check_content_type(response.content_type.as_deref());

            if response.body.len() > self.max_response_bytes {
                return Err(WebFingerError::protocol("response too large"));
            }
            if serde_json::from_str::<serde_json::Value>(&response.body).is_err() {
                return Err(WebFingerError::protocol("invalid json"));
            }
            return Ok(response.body);
        }
    }

    /// Resolves a `Location` header against the current URL and checks the destination.
    async fn validate_redirect(&self, current: &Url, location: &str) -> Result<Url, WebFingerError> {
        let next = current
            .join(location)
            .map_err(|_| WebFingerError::security("invalid redirect URL"))?;
        if !matches!(next.scheme(), "http" | "https") {
            return Err(WebFingerError::security("invalid redirect URL"));
        }

        let host = sanitize_host(&authority(&next)?)?;
        if !self.allow_private_addresses {
            if is_private_address(&host)? {
                return Err(WebFingerError::security(
                    "redirect to private or internal address blocked",
                ));
            }
            self.dns_guard.validate(&host).await?;
        }
        Ok(next)
    }
}

/// `host[:port]` of an http(s) URL.
pub(crate) fn authority(url: &Url) -> Result<String, WebFingerError> {
    let host = url
        .host_str()
        .ok_or_else(|| WebFingerError::security("invalid redirect URL"))?;
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Advisory media type check; never blocks processing.
fn check_content_type(content_type: Option<&str>) {
    let raw = content_type.unwrap_or_default();
    let main_type = raw
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();

    if main_type == JRD_MEDIA_TYPE {
        return;
    }
    if main_type == JSON_MEDIA_TYPE {
        info!(
            "Server uses \"{JSON_MEDIA_TYPE}\" instead of RFC 7033 recommended \"{JRD_MEDIA_TYPE}\""
        );
    } else {
        warn!(
            "Server returned unexpected content-type \"{raw}\"; expected \"{JRD_MEDIA_TYPE}\" per RFC 7033"
        );
    }
}
