//! Error types for the Gateway

use crate::core::completion::UpstreamError;
use thiserror::Error;

/// Result type alias for the Gateway
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the Gateway
///
/// A denied admission is not an error: it is a
/// [`RateLimitDecision`](crate::core::rate_limiter::RateLimitDecision) with
/// `allowed == false`.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration errors (missing credential, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rate-limit store failures on a mutating operation
    #[error("Storage error: {0}")]
    Storage(String),

    /// Redis errors
    #[cfg(feature = "redis")]
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Upstream failure surfaced without retry
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// Every attempt failed with a retryable error
    #[error("Completion request failed after {attempts} attempts. Last error: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<UpstreamError>,
    },

    /// The caller cancelled the request
    #[error("Request aborted")]
    Aborted,

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unauthorized errors
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Forbidden errors
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}
