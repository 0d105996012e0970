//! Test helpers for the RPC client

use super::{Client, ClientConfig, Credentials, Endpoints, Product, RetryConfig};
use mockito::Matcher;

pub fn test_config(url: &str) -> ClientConfig {
    let mut endpoints = Endpoints::new();
    for product in Product::ALL {
        endpoints = endpoints.with_override(product, url);
    }
    ClientConfig {
        credentials: Credentials::new("test-ak", "test-secret"),
        region: "cn-hangzhou".to_string(),
        endpoints,
        insecure: true,
        retry: RetryConfig {
            max_retries: 2,
            initial_backoff_ms: 1,
            max_backoff_ms: 5,
            timeout_seconds: 5,
        },
    }
}

pub fn create_test_client(url: &str) -> Client {
    Client::new(test_config(url)).unwrap()
}

/// Matches the `Action` query parameter plus any extra `key=value` pairs
pub fn action_query(action: &str, extra: &[(&str, &str)]) -> Matcher {
    let mut matchers = vec![Matcher::UrlEncoded("Action".into(), action.into())];
    matchers.extend(
        extra
            .iter()
            .map(|(k, v)| Matcher::UrlEncoded((*k).into(), (*v).into())),
    );
    Matcher::AllOf(matchers)
}

#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_retry_config() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.initial_backoff_ms, 100);
        assert_eq!(config.max_backoff_ms, 10000);
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_backoff_doubles_up_to_cap() {
        let config = RetryConfig::default();
        assert_eq!(config.backoff_ms(1), 100);
        assert_eq!(config.backoff_ms(2), 200);
        assert_eq!(config.backoff_ms(4), 800);
        assert_eq!(config.backoff_ms(12), 10000);
        assert_eq!(config.backoff_ms(70), 10000);
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let credentials = Credentials::new("ak", "very-secret").with_security_token("sts");
        let text = format!("{:?}", credentials);
        assert!(text.contains("ak"));
        assert!(!text.contains("very-secret"));
        assert!(!text.contains("sts\""));
    }

    #[test]
    fn test_invalid_endpoint_override_fails_client_creation() {
        let mut config = super::test_config("http://127.0.0.1:1");
        config.endpoints = Endpoints::new().with_override(Product::Ecs, "http://");
        assert!(matches!(
            Client::new(config),
            Err(ApiError::InvalidEndpoint(_))
        ));
    }
}
