//! Configuration loading and validation through the public API

#[cfg(test)]
mod tests {
    use completion_gateway::config::{Config, GatewayConfig, Validate};
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    /// A YAML file with every section parses and validates
    #[tokio::test]
    async fn test_load_full_file() {
        let file = write_config(
            r#"
server:
  host: 127.0.0.1
  port: 9090
provider:
  api_base: http://localhost:4010/v1
  default_model: gpt-4o-mini
rate_limit:
  max_requests_per_window: 5
  window_ms: 30000
retry:
  max_retries: 2
  jitter: false
logging:
  level: debug
"#,
        );

        let config = Config::from_file(file.path()).await.unwrap();
        assert_eq!(config.server().port, 9090);
        assert_eq!(config.provider().default_model, "gpt-4o-mini");
        assert_eq!(config.rate_limit().max_requests_per_window, 5);
        assert_eq!(config.rate_limit().window_ms, 30_000);
        assert_eq!(config.retry().max_retries, 2);
        assert!(!config.retry().jitter);
    }

    /// Omitted sections fall back to defaults
    #[tokio::test]
    async fn test_empty_file_uses_defaults() {
        let file = write_config("{}\n");
        let config = Config::from_file(file.path()).await.unwrap();

        assert_eq!(config.rate_limit().max_requests_per_window, 10);
        assert_eq!(config.rate_limit().window_ms, 60_000);
        assert_eq!(config.retry().max_retries, 3);
        assert_eq!(config.provider().default_model, "gpt-4");
    }

    /// Invalid values are rejected at load time
    #[tokio::test]
    async fn test_invalid_file_rejected() {
        let file = write_config("rate_limit:\n  max_requests_per_window: 0\n");
        let err = crate::assert_err!(Config::from_file(file.path()).await);
        assert!(err.to_string().contains("max_requests_per_window"));
    }

    #[tokio::test]
    async fn test_missing_file_is_config_error() {
        let err = crate::assert_err!(Config::from_file("/nonexistent/gateway.yaml").await);
        assert!(matches!(err, completion_gateway::GatewayError::Config(_)));
    }

    #[test]
    fn test_default_gateway_config_is_valid() {
        assert!(GatewayConfig::default().validate().is_ok());
    }

    #[test]
    fn test_retry_delay_bounds() {
        let mut config = GatewayConfig::default();
        config.retry.max_delay_ms = 10;
        config.retry.base_delay_ms = 1_000;
        let err = config.validate().unwrap_err();
        assert!(err.contains("max_delay_ms"));
    }
}
