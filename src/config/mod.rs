//! Client configuration and constants.
//!
//! This module provides:
//! - Protocol constants (endpoint list, media types, relay host, limits)
//! - The library `Config` and its defaults
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel, Opt};
