//! Rate limiting configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Per-identity fixed-window admission settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateLimitConfig {
    /// Requests admitted per identity per window
    #[serde(default = "default_max_requests_per_window")]
    pub max_requests_per_window: u32,
    /// Window length in milliseconds
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
    /// Prefix of the `<prefix>:<identity>:{window,count}` storage keys
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// How often the in-memory store drops expired entries
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests_per_window: default_max_requests_per_window(),
            window_ms: default_window_ms(),
            key_prefix: default_key_prefix(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}
