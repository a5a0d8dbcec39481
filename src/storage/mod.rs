//! Rate-limit counter storage
//!
//! The admission controller only talks to [`RateLimitStore`]. Two backends
//! exist: Redis (shared across instances, atomic `INCR`) and an in-process
//! map (single instance only). The backend is chosen once at startup by
//! [`select_store`].

pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;

pub use memory::MemoryStore;
#[cfg(feature = "redis")]
pub use self::redis::{RedisPool, RedisStore};

use crate::config::{RateLimitConfig, StorageConfig};
use crate::core::clock::Clock;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Key/value counter storage
///
/// `get` and `set` never fail: backend errors are logged and read as "no
/// data" so that an outage degrades admission instead of crashing it.
/// `increment` must propagate failures, because a lost increment would
/// otherwise be counted as a successful admission.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    async fn get(&self, key: &str) -> Option<String>;

    async fn set(&self, key: &str, value: &str, ttl_secs: Option<u64>);

    /// Increment the counter at `key` and return the new value
    async fn increment(&self, key: &str, ttl_secs: Option<u64>) -> Result<i64>;
}

/// Pick the counter backend for this process.
///
/// Redis is used when enabled and answering `PING`; otherwise the in-process
/// store is started with its expiry sweeper.
pub async fn select_store(
    storage: &StorageConfig,
    rate_limit: &RateLimitConfig,
    clock: Arc<dyn Clock>,
) -> Arc<dyn RateLimitStore> {
    #[cfg(feature = "redis")]
    if storage.redis.enabled {
        match RedisPool::new(&storage.redis).await {
            Ok(pool) => match pool.health_check().await {
                Ok(()) => {
                    info!("Rate limiter using Redis storage");
                    return Arc::new(RedisStore::new(pool));
                }
                Err(e) => warn!(error = %e, "Redis health check failed"),
            },
            Err(e) => warn!(error = %e, "Redis connection failed"),
        }
    }

    #[cfg(not(feature = "redis"))]
    if storage.redis.enabled {
        warn!("Redis requested but the `redis` feature is disabled");
    }

    warn!("Redis not available, using in-memory storage for the rate limiter");
    MemoryStore::with_sweeper(
        clock,
        Duration::from_secs(rate_limit.sweep_interval_secs.max(1)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::SystemClock;

    #[tokio::test]
    async fn test_select_store_falls_back_to_memory_when_redis_disabled() {
        let storage = StorageConfig::default();
        let store = select_store(&storage, &RateLimitConfig::default(), Arc::new(SystemClock)).await;
        assert_eq!(store.name(), "memory");
    }

    #[cfg(feature = "redis")]
    #[tokio::test]
    async fn test_select_store_falls_back_when_redis_unreachable() {
        let mut storage = StorageConfig::default();
        storage.redis.enabled = true;
        storage.redis.url = "redis://127.0.0.1:1".to_string();
        storage.redis.connection_timeout_secs = 1;

        let store = select_store(&storage, &RateLimitConfig::default(), Arc::new(SystemClock)).await;
        assert_eq!(store.name(), "memory");
    }
}
