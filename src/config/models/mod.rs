//! Configuration data models
//!
//! This module defines all configuration structures used throughout the gateway.

pub mod gateway;
pub mod logging;
pub mod provider;
pub mod rate_limit;
pub mod retry;
pub mod server;
pub mod storage;

pub use gateway::*;
pub use logging::*;
pub use provider::*;
pub use rate_limit::*;
pub use retry::*;
pub use server::*;
pub use storage::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8080
}

pub fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

pub fn default_model() -> String {
    "gpt-4".to_string()
}

pub fn default_temperature() -> f32 {
    0.7
}

/// Per-attempt upstream timeout in seconds
pub fn default_request_timeout() -> u64 {
    60
}

pub fn default_max_requests_per_window() -> u32 {
    10
}

pub fn default_window_ms() -> u64 {
    60_000
}

pub fn default_key_prefix() -> String {
    "openai:ratelimit".to_string()
}

pub fn default_sweep_interval() -> u64 {
    30
}

/// Default maximum retry attempts
pub fn default_max_retries() -> u32 {
    3
}

pub fn default_base_delay_ms() -> u64 {
    1_000
}

pub fn default_max_delay_ms() -> u64 {
    10_000
}

pub fn default_backoff_multiplier() -> f64 {
    2.0
}

pub fn default_max_jitter_ms() -> u64 {
    1_000
}

pub fn default_true() -> bool {
    true
}

pub fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

pub fn default_connection_timeout() -> u64 {
    5
}

pub fn default_log_level() -> String {
    "info".to_string()
}
