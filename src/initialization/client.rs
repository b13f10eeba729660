//! HTTP client initialization.

use reqwest::ClientBuilder;

use crate::config::ProviderConfig;

/// Builds the `reqwest::Client` used for provider requests.
///
/// Configured with the per-request timeout and User-Agent from `config`.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(config: &ProviderConfig) -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .timeout(config.timeout)
        .user_agent(config.user_agent.clone())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_init_client_with_custom_timeout() {
        let config = ProviderConfig {
            timeout: Duration::from_millis(250),
            ..ProviderConfig::new("key")
        };
        assert!(init_client(&config).is_ok());
    }
}
