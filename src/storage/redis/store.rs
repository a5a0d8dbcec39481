//! Redis implementation of the rate-limit store

use super::pool::RedisPool;
use crate::storage::RateLimitStore;
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::error;

/// Rate-limit store shared by every gateway instance pointing at the same
/// Redis. `increment` maps to `INCR`, which is atomic server-side.
#[derive(Debug, Clone)]
pub struct RedisStore {
    pool: RedisPool,
}

impl RedisStore {
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RateLimitStore for RedisStore {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.pool.connection();
        match conn.get::<_, Option<String>>(key).await {
            Ok(value) => value,
            Err(e) => {
                error!(key, error = %e, "Redis GET failed");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: Option<u64>) {
        let mut conn = self.pool.connection();
        let result: redis::RedisResult<()> = match ttl_secs {
            Some(ttl) => conn.set_ex(key, value, ttl.max(1)).await,
            None => conn.set(key, value).await,
        };
        if let Err(e) = result {
            error!(key, error = %e, "Redis SET failed");
        }
    }

    async fn increment(&self, key: &str, ttl_secs: Option<u64>) -> Result<i64> {
        let mut conn = self.pool.connection();
        let value: i64 = conn.incr(key, 1).await.map_err(|e| {
            error!(key, error = %e, "Redis INCR failed");
            GatewayError::Redis(e)
        })?;

        // TTL is only attached when the counter is created
        if let Some(ttl) = ttl_secs {
            if value == 1 {
                let _: () = conn
                    .expire(key, ttl.max(1) as i64)
                    .await
                    .map_err(GatewayError::Redis)?;
            }
        }

        Ok(value)
    }
}
