//! Byte transport capability.
//!
//! The client never follows redirects or interprets responses at this layer:
//! a [`Transport`] performs exactly one GET and reports status, the headers
//! the fetcher needs, and a size-capped body.

use futures::future::BoxFuture;
use reqwest::header::{HeaderName, ACCEPT, CONTENT_TYPE, LOCATION};
use url::Url;

use crate::config::ACCEPT_HEADER;
use crate::error_handling::TransportError;

/// One HTTP response, as seen by the redirect-safe fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// `Location` header, if present and valid UTF-8
    pub location: Option<String>,
    /// `Content-Type` header, if present and valid UTF-8
    pub content_type: Option<String>,
    /// Response body (lossily decoded as UTF-8)
    pub body: String,
}

/// Single-request HTTP GET capability.
///
/// Implementations must not follow redirects: a 3xx response is returned
/// as-is so that every hop can be re-validated.
pub trait Transport: Send + Sync {
    fn get<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<TransportResponse, TransportError>>;
}

/// [`Transport`] backed by a `reqwest::Client` built with redirects disabled.
///
/// See [`crate::initialization::init_transport`].
pub struct ReqwestTransport {
    client: reqwest::Client,
    max_body_bytes: usize,
}

impl ReqwestTransport {
    /// Wraps a client. Bodies are read up to `max_body_bytes + 1` bytes so
    /// that oversized responses are detectable without buffering them whole.
    pub fn new(client: reqwest::Client, max_body_bytes: usize) -> Self {
        Self {
            client,
            max_body_bytes,
        }
    }
}

impl Transport for ReqwestTransport {
    fn get<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<TransportResponse, TransportError>> {
        Box::pin(async move {
            let mut response = self
                .client
                .get(url.clone())
                .header(ACCEPT, ACCEPT_HEADER)
                .send()
                .await?;

            let status = response.status();
            let header = |name: HeaderName| {
                response
                    .headers()
                    .get(name)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string)
            };
            let location = header(LOCATION);
            let content_type = header(CONTENT_TYPE);

            let mut body: Vec<u8> = Vec::new();
            if !status.is_redirection() {
                while let Some(chunk) = response.chunk().await? {
                    body.extend_from_slice(&chunk);
                    if body.len() > self.max_body_bytes {
                        break;
                    }
                }
            }

            Ok(TransportResponse {
                status: status.as_u16(),
                location,
                content_type,
                body: String::from_utf8_lossy(&body).into_owned(),
            })
        })
    }
}
