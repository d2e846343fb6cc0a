//! Configuration types and CLI options.
//!
//! This module defines the library `Config` (immutable per client instance)
//! and the `clap` structures used by the command-line binary.

use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_MAX_RESPONSE_BYTES, DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Client configuration.
///
/// A `Config` is fixed for the lifetime of a [`crate::WebFinger`] client; all
/// per-lookup state lives inside the lookup call itself.
///
/// # Examples
///
/// ```
/// use webfinger_client::Config;
///
/// let config = Config {
///     tls_only: false,
///     uri_fallback: true,
///     ..Default::default()
/// };
/// assert!(!config.allow_private_addresses);
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Only use HTTPS. When false, a failed HTTPS cascade is retried over plain HTTP.
    pub tls_only: bool,

    /// Try `host-meta` and `host-meta.json` after the `webfinger` endpoint fails.
    pub uri_fallback: bool,

    /// Use the WebFist discovery relay as a last resort.
    ///
    /// Deprecated: WebFist is not part of RFC 7033 and is kept for compatibility only.
    pub webfist_fallback: bool,

    /// Timeout applied to each individual HTTP request.
    pub request_timeout: Duration,

    /// Permit requests to private, loopback and link-local addresses.
    pub allow_private_addresses: bool,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Maximum accepted response body size in bytes
    pub max_response_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tls_only: true,
            uri_fallback: false,
            webfist_fallback: false,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            allow_private_addresses: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Look up a user address
/// webfinger_client nick@silverbucket.net
///
/// # Only print the first avatar link, trying host-meta endpoints too
/// webfinger_client nick@silverbucket.net --rel avatar --uri-fallback
///
/// # Talk to a local development server
/// webfinger_client test@localhost:8080 --allow-http --allow-private-addresses
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "webfinger_client",
    about = "Looks up a user address or URI via WebFinger (RFC 7033)."
)]
pub struct Opt {
    /// Address to look up (user@host or a full URI)
    pub address: String,

    /// Print only the first link of this relation (avatar, profile, blog, ...)
    #[arg(long)]
    pub rel: Option<String>,

    /// Print the raw JRD document instead of the indexed result
    #[arg(long)]
    pub raw: bool,

    /// Allow falling back to plain HTTP
    #[arg(long)]
    pub allow_http: bool,

    /// Try host-meta and host-meta.json when the webfinger endpoint fails
    #[arg(long)]
    pub uri_fallback: bool,

    /// Use the deprecated WebFist relay as a last resort
    #[arg(long)]
    pub webfist_fallback: bool,

    /// Per-request timeout in milliseconds
    #[arg(long, default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Allow requests to private and internal addresses
    #[arg(long)]
    pub allow_private_addresses: bool,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl From<&Opt> for Config {
    fn from(opt: &Opt) -> Self {
        Self {
            tls_only: !opt.allow_http,
            uri_fallback: opt.uri_fallback,
            webfist_fallback: opt.webfist_fallback,
            request_timeout: Duration::from_millis(opt.timeout_ms),
            allow_private_addresses: opt.allow_private_addresses,
            user_agent: opt.user_agent.clone(),
            ..Default::default()
        }
    }
}
