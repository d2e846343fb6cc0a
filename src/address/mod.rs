//! Address parsing.
//!
//! Splits a lookup input into the target host and the resource identifier sent
//! in the `resource` query parameter. Two shapes are accepted:
//! - user addresses (`user@host`, optionally prefixed with `acct:`)
//! - full URIs (`https://host/path`)

use crate::config::ACCT_SCHEME_PREFIX;
use crate::error_handling::WebFingerError;

/// A parsed lookup address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAddress {
    /// The address with all spaces removed
    pub address: String,
    /// Raw host segment, not yet sanitized
    pub host: String,
    /// Whether the address already carries an explicit scheme
    pub has_scheme: bool,
}

impl ParsedAddress {
    /// Resource identifier for the `resource` query parameter.
    ///
    /// Addresses without an explicit scheme are sent as `acct:` URIs.
    pub fn resource(&self) -> String {
        if self.has_scheme {
            self.address.clone()
        } else {
            format!("{ACCT_SCHEME_PREFIX}{}", self.address)
        }
    }
}

/// Parses a user address or URI.
///
/// # Errors
///
/// Returns `WebFingerError::Validation` with one of:
/// - `address is required` for empty input
/// - `invalid URI format` when a URI has fewer than three `/` segments
/// - `invalid useraddress format` unless there is exactly one `@` with a non-empty host
/// - `could not determine host from address` when the host segment is empty
pub fn parse_address(address: &str) -> Result<ParsedAddress, WebFingerError> {
    if address.is_empty() {
        return Err(WebFingerError::validation("address is required"));
    }

    let stripped: String = address.chars().filter(|c| *c != ' ').collect();

    let (host, has_scheme) = if address.contains("://") {
        let parts: Vec<&str> = stripped.split('/').collect();
        if parts.len() < 3 {
            return Err(WebFingerError::validation("invalid URI format"));
        }
        let has_scheme = stripped
            .split_once("://")
            .is_some_and(|(_, rest)| !rest.is_empty());
        (parts[2].to_string(), has_scheme)
    } else {
        let parts: Vec<&str> = stripped.split('@').collect();
        if parts.len() != 2 || parts[1].is_empty() {
            return Err(WebFingerError::validation("invalid useraddress format"));
        }
        let has_scheme = stripped
            .get(..ACCT_SCHEME_PREFIX.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(ACCT_SCHEME_PREFIX));
        (parts[1].to_string(), has_scheme)
    };

    if host.is_empty() {
        return Err(WebFingerError::validation(
            "could not determine host from address",
        ));
    }

    Ok(ParsedAddress {
        address: stripped,
        host,
        has_scheme,
    })
}
