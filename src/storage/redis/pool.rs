//! Redis connection management
//!
//! This module provides Redis connectivity and health checks. The shared
//! [`ConnectionManager`] reconnects on its own after the server restarts.

use crate::config::RedisConfig;
use crate::utils::error::{GatewayError, Result};
use redis::{Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, info};

/// Shared, self-reconnecting Redis connection
#[derive(Clone)]
pub struct RedisPool {
    connection: ConnectionManager,
    url: String,
}

impl std::fmt::Debug for RedisPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisPool")
            .field("url", &Self::sanitize_url(&self.url))
            .finish()
    }
}

impl RedisPool {
    /// Connect to Redis, giving up after the configured timeout
    pub async fn new(config: &RedisConfig) -> Result<Self> {
        info!("Creating Redis connection");
        debug!("Redis URL: {}", Self::sanitize_url(&config.url));

        let client = Client::open(config.url.as_str()).map_err(GatewayError::Redis)?;

        let timeout = Duration::from_secs(config.connection_timeout_secs.max(1));
        let connection = tokio::time::timeout(timeout, client.get_connection_manager())
            .await
            .map_err(|_| {
                GatewayError::storage(format!(
                    "Timed out connecting to Redis after {}s",
                    timeout.as_secs()
                ))
            })?
            .map_err(GatewayError::Redis)?;

        info!("Redis connection established");
        Ok(Self {
            connection,
            url: config.url.clone(),
        })
    }

    /// A handle on the shared connection
    pub(crate) fn connection(&self) -> ConnectionManager {
        self.connection.clone()
    }

    /// Availability probe
    pub async fn health_check(&self) -> Result<()> {
        debug!("Performing Redis health check");
        let mut conn = self.connection();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(GatewayError::Redis)?;
        debug!("Redis health check passed");
        Ok(())
    }

    /// Sanitize Redis URL for logging (hide password)
    pub(crate) fn sanitize_url(url: &str) -> String {
        if let Ok(parsed) = url::Url::parse(url) {
            let mut sanitized = parsed.clone();
            if sanitized.password().is_some() {
                let _ = sanitized.set_password(Some("***"));
            }
            sanitized.to_string()
        } else {
            "invalid_url".to_string()
        }
    }
}
