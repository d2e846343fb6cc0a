//! Construction of the default capabilities and the logger.
//!
//! - HTTP transport (reqwest, redirects disabled, connect-time SSRF filter)
//! - DNS resolver for the resolution guard (hickory)
//! - `env_logger` setup for the binary

mod client;
mod logger;
mod resolver;

pub use client::init_transport;
pub use logger::init_logger_with;
pub use resolver::init_resolver;
