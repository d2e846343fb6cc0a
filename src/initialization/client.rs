//! HTTP transport initialization.

use std::sync::Arc;

use reqwest::ClientBuilder;

use crate::config::Config;
use crate::error_handling::InitializationError;
use crate::fetch::{ReqwestTransport, Transport};
use crate::security::PublicOnlyResolver;

/// Builds the default [`Transport`] for a client configuration.
///
/// The underlying `reqwest::Client` never follows redirects (the fetcher
/// follows them itself) and applies `config.request_timeout` to each request.
/// Unless private addresses are allowed, connections go through
/// [`PublicOnlyResolver`], which drops private answers at connect time.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if the client cannot be built.
pub fn init_transport(config: &Config) -> Result<Arc<dyn Transport>, InitializationError> {
    let mut builder = ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(config.request_timeout)
        .user_agent(config.user_agent.clone());
    if !config.allow_private_addresses {
        builder = builder.dns_resolver(Arc::new(PublicOnlyResolver));
    }
    let client = builder.build()?;
    Ok(Arc::new(ReqwestTransport::new(
        client,
        config.max_response_bytes,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_init_transport_with_defaults() {
        assert!(init_transport(&Config::default()).is_ok());
    }

    #[tokio::test]
    async fn test_init_transport_allowing_private_addresses() {
        let config = Config {
            allow_private_addresses: true,
            request_timeout: Duration::from_millis(250),
            user_agent: "test-agent/1.0".to_string(),
            ..Config::default()
        };
        assert!(init_transport(&config).is_ok());
    }
}
