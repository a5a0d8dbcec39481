//! Storage configuration validators

use super::Validate;
use crate::config::models::*;
use url::Url;

impl Validate for StorageConfig {
    fn validate(&self) -> Result<(), String> {
        self.redis.validate()
    }
}

impl Validate for RedisConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }
        let url = Url::parse(&self.url).map_err(|e| format!("Invalid Redis URL: {}", e))?;
        if !matches!(url.scheme(), "redis" | "rediss") {
            return Err(format!(
                "Redis URL must use redis:// or rediss:// scheme, got: {}",
                url.scheme()
            ));
        }
        if self.connection_timeout_secs == 0 {
            return Err("Redis connection timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}
