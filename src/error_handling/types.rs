//! Error type definitions.
//!
//! This module defines the public lookup error, the errors of the injected
//! capabilities (transport and DNS), and initialization errors.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error returned by [`crate::WebFinger::lookup`] and [`crate::WebFinger::lookup_link`].
///
/// The display form is the bare message (`address is required`,
/// `too many redirects`, ...) so callers can match on it directly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WebFingerError {
    /// Missing or malformed input (address, host, relation name).
    #[error("{0}")]
    Validation(String),

    /// A request was refused because it would reach a private or internal target.
    #[error("{0}")]
    Security(String),

    /// The server answered, but not with a usable JRD.
    #[error("{message}")]
    Protocol {
        /// Human-readable description
        message: String,
        /// HTTP status, when the failure came from a status code
        status: Option<u16>,
    },

    /// Transport-level failure (timeout, connection refused, ...).
    #[error("{0}")]
    Unknown(String),
}

/// Coarse category of a [`WebFingerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorKind {
    Validation,
    Security,
    Protocol,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Security => "security",
            ErrorKind::Protocol => "protocol",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl WebFingerError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        WebFingerError::Validation(message.into())
    }

    pub(crate) fn security(message: impl Into<String>) -> Self {
        WebFingerError::Security(message.into())
    }

    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        WebFingerError::Protocol {
            message: message.into(),
            status: None,
        }
    }

    pub(crate) fn protocol_status(message: impl Into<String>, status: u16) -> Self {
        WebFingerError::Protocol {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            WebFingerError::Validation(_) => ErrorKind::Validation,
            WebFingerError::Security(_) => ErrorKind::Security,
            WebFingerError::Protocol { .. } => ErrorKind::Protocol,
            WebFingerError::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            WebFingerError::Protocol { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether the fallback cascade may move on to its next stage after this error.
    ///
    /// Validation and security failures are final.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WebFingerError::Protocol { .. } | WebFingerError::Unknown(_)
        )
    }
}

/// Failure reported by a [`crate::Transport`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request exceeded the per-request timeout.
    #[error("request timed out")]
    Timeout,

    /// No connection could be established.
    #[error("unable to connect: {0}")]
    Connect(String),

    /// Any other transport failure (body read, protocol violation, ...).
    #[error("{0}")]
    Other(String),
}

impl From<ReqwestError> for TransportError {
    fn from(e: ReqwestError) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else {
            TransportError::Other(e.to_string())
        }
    }
}

impl From<TransportError> for WebFingerError {
    fn from(e: TransportError) -> Self {
        WebFingerError::Unknown(format!("error during request: {e}"))
    }
}

/// Failure reported by a [`crate::DnsResolver`].
///
/// These are infrastructure failures (NXDOMAIN, timeouts); the DNS guard logs
/// and ignores them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("DNS lookup for {host} failed: {message}")]
pub struct DnsLookupError {
    pub host: String,
    pub message: String,
}

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}
