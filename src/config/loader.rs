//! Environment overrides
//!
//! Values from the environment take precedence over the YAML file.

use super::models::*;
use crate::utils::error::{GatewayError, Result};
use std::env;
use std::str::FromStr;
use tracing::debug;

fn parse_var<T: FromStr>(name: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| GatewayError::Config(format!("Invalid {}: {}", name, e)))
}

impl GatewayConfig {
    /// Apply environment variable overrides in place
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_vars(|name| env::var(name).ok())
    }

    pub(crate) fn apply_vars<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = var("GATEWAY_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("GATEWAY_PORT") {
            self.server.port = parse_var("GATEWAY_PORT", &port)?;
        }

        if let Some(key) = var("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.provider.api_key = Some(key);
        }
        if let Some(base) = var("OPENAI_API_BASE") {
            self.provider.api_base = base;
        }
        if let Some(model) = var("OPENAI_MODEL") {
            self.provider.default_model = model;
        }

        if let Some(max) = var("RATE_LIMIT_MAX_REQUESTS") {
            self.rate_limit.max_requests_per_window = parse_var("RATE_LIMIT_MAX_REQUESTS", &max)?;
        }
        if let Some(window) = var("RATE_LIMIT_WINDOW_MS") {
            self.rate_limit.window_ms = parse_var("RATE_LIMIT_WINDOW_MS", &window)?;
        }

        if let Some(url) = var("REDIS_URL") {
            self.storage.redis.url = url;
            self.storage.redis.enabled = true;
        }

        debug!("Applied environment overrides");
        Ok(())
    }
}
