//! Configuration management for the Gateway
//!
//! This module handles loading, validation, and management of all gateway configuration.

pub mod loader;
pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{GatewayError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the Gateway
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Gateway configuration
    pub gateway: GatewayConfig,
}

impl Config {
    /// Load configuration from file, then apply environment overrides
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GatewayError::Config(format!("Failed to read config file: {}", e)))?;

        let mut gateway: GatewayConfig = serde_yaml::from_str(&content)?;
        gateway.apply_env()?;

        let config = Self { gateway };
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut gateway = GatewayConfig::default();
        gateway.apply_env()?;

        let config = Self { gateway };
        config.validate()?;
        Ok(config)
    }

    pub fn server(&self) -> &ServerConfig {
        &self.gateway.server
    }

    pub fn provider(&self) -> &ProviderConfig {
        &self.gateway.provider
    }

    pub fn rate_limit(&self) -> &RateLimitConfig {
        &self.gateway.rate_limit
    }

    pub fn retry(&self) -> &RetryConfig {
        &self.gateway.retry
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.gateway.storage
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.gateway.logging
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");
        self.gateway.validate().map_err(GatewayError::Config)?;
        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to YAML string (credentials are never serialized)
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.gateway)
            .map_err(|e| GatewayError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_config_from_file() {
        let config_content = r#"
server:
  host: "127.0.0.1"
  port: 9090
provider:
  default_model: "gpt-4o-mini"
rate_limit:
  max_requests_per_window: 5
  window_ms: 30000
retry:
  max_retries: 2
"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(config_content.as_bytes()).unwrap();

        let config = Config::from_file(file.path()).await.unwrap();
        assert_eq!(config.server().host, "127.0.0.1");
        assert_eq!(config.server().port, 9090);
        assert_eq!(config.provider().default_model, "gpt-4o-mini");
        assert_eq!(config.rate_limit().max_requests_per_window, 5);
        assert_eq!(config.rate_limit().window_ms, 30_000);
        assert_eq!(config.retry().max_retries, 2);
        assert_eq!(config.retry().base_delay_ms, 1_000);
    }

    #[tokio::test]
    async fn test_config_from_missing_file() {
        let err = Config::from_file("/definitely/not/here.yaml").await.unwrap_err();
        assert!(matches!(err, GatewayError::Config(_)));
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"rate_limit:\n  max_requests_per_window: 0\n")
            .unwrap();
        let err = Config::from_file(file.path()).await.unwrap_err();
        assert!(err.to_string().contains("max_requests_per_window"));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }
}
