//! Host sanitization and private address classification (SSRF protection).
//!
//! Every host the client is about to contact passes through here:
//! - [`sanitize_host`] cuts a raw host segment down to `host[:port]`
//! - [`is_private_address`] decides whether that host points at a
//!   private, loopback, link-local, multicast or reserved target
//!
//! Host literals are parsed with the same WHATWG host parser `reqwest` uses
//! (`url::Host::parse`), so shorthand and encoded IPv4 forms such as
//! `127.1` or `0x7f.0.0.1` are classified exactly as they would be dialled.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use once_cell::sync::Lazy;
use regex::Regex;
use url::Host;

use crate::error_handling::WebFingerError;

/// Localhost forms that select plain HTTP for the first attempt.
static LOCALHOST_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^localhost(\.localdomain)?(:[0-9]+)?$").expect("valid localhost pattern")
});

fn invalid_host() -> WebFingerError {
    WebFingerError::validation("invalid host format")
}

/// Reduces a raw host segment to `host[:port]`.
///
/// Everything from the first `/` on is discarded, so path and query smuggling
/// (`user@localhost:7000/admin?`) cannot reach the request URL.
///
/// # Errors
///
/// - `invalid host format` if nothing is left
/// - `invalid characters in host` if `?`, `#`, `@`, `\` or whitespace remain
pub fn sanitize_host(raw: &str) -> Result<String, WebFingerError> {
    let host = raw.split('/').next().unwrap_or_default();
    if host.is_empty() {
        return Err(invalid_host());
    }
    if host
        .chars()
        .any(|c| matches!(c, '?' | '#' | '@' | '\\') || c.is_whitespace())
    {
        return Err(WebFingerError::validation("invalid characters in host"));
    }
    Ok(host.to_string())
}

/// Returns true for `localhost` and `localhost.localdomain`, with or without a port.
pub fn is_localhost(host: &str) -> bool {
    LOCALHOST_PATTERN.is_match(host)
}

/// Classifies a sanitized host (optionally carrying a port).
///
/// # Errors
///
/// Fails closed with `invalid host format` when the host cannot be parsed
/// unambiguously: a non-numeric or out-of-range port, a single colon whose
/// left side is not a valid host, an IPv4 literal with octets above 255, or
/// an IPv6 literal that does not parse.
pub fn is_private_address(host: &str) -> Result<bool, WebFingerError> {
    let name = strip_port(host)?;
    Ok(match parse_host(name)? {
        Host::Domain(domain) => is_localhost_domain(&domain),
        Host::Ipv4(ip) => is_private_ipv4(ip),
        Host::Ipv6(ip) => is_private_ipv6(ip),
    })
}

/// Returns the host without its port, validating the port if one is present.
///
/// `[v6]` and `[v6]:port` are IPv6; `name:port` with a single colon is a
/// host/port pair; two or more colons outside brackets is a bare IPv6 literal.
pub(crate) fn strip_port(host: &str) -> Result<&str, WebFingerError> {
    if host.starts_with('[') {
        let end = host.find(']').ok_or_else(invalid_host)?;
        let (literal, rest) = host.split_at(end + 1);
        if rest.is_empty() {
            return Ok(literal);
        }
        let port = rest.strip_prefix(':').ok_or_else(invalid_host)?;
        validate_port(port)?;
        return Ok(literal);
    }

    match host.matches(':').count() {
        0 => Ok(host),
        1 => {
            let (name, port) = host.split_once(':').ok_or_else(invalid_host)?;
            // Same parser as a bare host, so IDNs keep working with a port.
            Host::parse(name).map_err(|_| invalid_host())?;
            validate_port(port)?;
            Ok(name)
        }
        _ => Ok(host),
    }
}

fn validate_port(port: &str) -> Result<(), WebFingerError> {
    let numeric = !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit());
    if numeric && port.parse::<u16>().is_ok() {
        Ok(())
    } else {
        Err(invalid_host())
    }
}

/// Parses a host without port, accepting bare IPv6 literals.
pub(crate) fn parse_host(name: &str) -> Result<Host, WebFingerError> {
    let parsed = if name.contains(':') && !name.starts_with('[') {
        Host::parse(&format!("[{name}]"))
    } else {
        Host::parse(name)
    };
    parsed.map_err(|_| invalid_host())
}

/// Checks whether a resolved or literal IP address is private/internal.
pub fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_private_ipv4(v4),
        IpAddr::V6(v6) => is_private_ipv6(v6),
    }
}

/// Checks if an IPv4 address is private/internal.
///
/// Private ranges:
/// - 10.0.0.0/8, 172.16.0.0/12, 192.168.0.0/16 (RFC 1918)
/// - 127.0.0.0/8 (loopback)
/// - 169.254.0.0/16 (link-local)
/// - 0.0.0.0/8 (this network)
/// - 224.0.0.0/4 (multicast)
/// - 240.0.0.0/4 (reserved)
fn is_private_ipv4(ip: Ipv4Addr) -> bool {
    let octets = ip.octets();

    // 127.0.0.0/8 (loopback)
    if octets[0] == 127 {
        return true;
    }

    // 10.0.0.0/8
    if octets[0] == 10 {
        return true;
    }

    // 172.16.0.0/12
    if octets[0] == 172 && (16..=31).contains(&octets[1]) {
        return true;
    }

    // 192.168.0.0/16
    if octets[0] == 192 && octets[1] == 168 {
        return true;
    }

    // 169.254.0.0/16 (link-local)
    if octets[0] == 169 && octets[1] == 254 {
        return true;
    }

    // 0.0.0.0/8 (this network)
    if octets[0] == 0 {
        return true;
    }

    // 224.0.0.0/4 (multicast)
    if (224..=239).contains(&octets[0]) {
        return true;
    }

    // 240.0.0.0/4 (reserved)
    octets[0] >= 240
}

/// Checks if an IPv6 address is private/internal.
///
/// Private ranges:
/// - ::1 (loopback) and :: (unspecified)
/// - fc00::/7 (unique local addresses)
/// - fe80::/10 (link-local)
/// - ff00::/8 (multicast)
/// - ::ffff:0:0/96 mapping a private IPv4 address
fn is_private_ipv6(ip: Ipv6Addr) -> bool {
    if let Some(v4) = ip.to_ipv4_mapped() {
        return is_private_ipv4(v4);
    }

    let segments = ip.segments();

    // ::1 (loopback), :: (unspecified)
    if segments == [0, 0, 0, 0, 0, 0, 0, 1] || segments == [0; 8] {
        return true;
    }

    // fc00::/7 (unique local addresses)
    if (segments[0] & 0xfe00) == 0xfc00 {
        return true;
    }

    // fe80::/10 (link-local)
    if (segments[0] & 0xffc0) == 0xfe80 {
        return true;
    }

    // ff00::/8 (multicast)
    segments[0] & 0xff00 == 0xff00
}

/// Checks if a domain name is a localhost variant.
fn is_localhost_domain(domain: &str) -> bool {
    let domain_lower = domain.to_lowercase();
    matches!(
        domain_lower.as_str(),
        "localhost" | "localhost." | "localhost.localdomain" | "localhost.localdomain."
    ) || domain_lower.ends_with(".localhost")
        || domain_lower.ends_with(".localhost.")
}
