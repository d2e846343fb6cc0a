//! Error handling.
//!
//! This module provides the error taxonomy of the client:
//! - **Validation**: missing or malformed address, host or relation
//! - **Security**: private targets, DNS rebinding, unsafe redirects
//! - **Protocol**: non-success statuses, invalid JSON, unknown response shapes
//! - **Unknown**: transport failures
//!
//! plus the failure types of the injected transport and DNS capabilities.

mod types;

// Re-export public API
pub use types::{
    DnsLookupError, ErrorKind, InitializationError, TransportError, WebFingerError,
};
