//! Configuration constants.
//!
//! This module defines the fixed discovery surface (well-known endpoints,
//! media types, property URIs) and the operational limits used by the client.

use std::time::Duration;

/// Well-known endpoints, tried in order when `uri_fallback` is enabled.
pub const ENDPOINTS: &[&str] = &["webfinger", "host-meta", "host-meta.json"];

/// Host of the deprecated WebFist discovery relay.
pub const LEGACY_RELAY_HOST: &str = "webfist.org";

/// Maximum number of redirect hops followed for a single request.
pub const MAX_REDIRECTS: usize = 3;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Default cap on the size of a JRD response body (1 MiB).
/// Discovery documents are small; anything larger is rejected rather than buffered.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 1024 * 1024;

/// Default User-Agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("webfinger_client/", env!("CARGO_PKG_VERSION"));

/// Accept header sent with every discovery request.
pub const ACCEPT_HEADER: &str = "application/jrd+json, application/json";

/// Media type recommended by RFC 7033.
pub const JRD_MEDIA_TYPE: &str = "application/jrd+json";
/// Generic JSON media type, tolerated with an informational note.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Property URI whose value becomes `index.properties.name`.
pub const DISPLAY_NAME_PROPERTY: &str = "http://packetizer.com/ns/name";

/// Resource scheme used when the caller did not supply one.
pub const ACCT_SCHEME_PREFIX: &str = "acct:";

// DNS guard
/// DNS query timeout in seconds
pub const DNS_TIMEOUT_SECS: u64 = 3;
/// DNS attempts per query
pub const DNS_ATTEMPTS: usize = 2;
