//! Tests for configuration validators

use super::Validate;
use crate::config::models::*;

#[test]
fn test_default_gateway_config_is_valid() {
    assert!(GatewayConfig::default().validate().is_ok());
}

#[test]
fn test_server_port_zero_rejected() {
    let config = ServerConfig {
        port: 0,
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_provider_bad_scheme_rejected() {
    let config = ProviderConfig {
        api_base: "ftp://llm.example.com".to_string(),
        ..Default::default()
    };
    let err = config.validate().unwrap_err();
    assert!(err.contains("scheme"));
}

#[test]
fn test_provider_temperature_range() {
    let config = ProviderConfig {
        default_temperature: 2.5,
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_missing_api_key_is_not_a_validation_error() {
    let config = ProviderConfig {
        api_key: None,
        ..Default::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_rate_limit_zero_window_rejected() {
    let config = RateLimitConfig {
        window_ms: 0,
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_retry_delay_ordering() {
    let config = RetryConfig {
        base_delay_ms: 5_000,
        max_delay_ms: 1_000,
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_retry_multiplier_below_one_rejected() {
    let config = RetryConfig {
        backoff_multiplier: 0.5,
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_redis_disabled_skips_url_check() {
    let config = RedisConfig {
        enabled: false,
        url: "nonsense".to_string(),
        connection_timeout_secs: 5,
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_redis_enabled_requires_redis_scheme() {
    let config = RedisConfig {
        enabled: true,
        url: "http://cache:6379".to_string(),
        connection_timeout_secs: 5,
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_gateway_error_names_section() {
    let config = GatewayConfig {
        rate_limit: RateLimitConfig {
            max_requests_per_window: 0,
            ..Default::default()
        },
        ..Default::default()
    };
    let err = config.validate().unwrap_err();
    assert!(err.starts_with("Rate limit config error"));
}
