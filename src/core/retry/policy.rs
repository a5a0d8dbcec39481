//! Retry policy and backoff arithmetic

use crate::config::models::retry::RetryConfig;
use rand::Rng;
use std::time::Duration;

/// Retry limits for one client, optionally overridden per call
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; a request makes at most `max_retries + 1` attempts
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    /// Upper bound of the random delay added to each backoff, zero disables jitter
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            backoff_multiplier: config.backoff_multiplier,
            max_jitter: if config.jitter {
                Duration::from_millis(config.max_jitter_ms)
            } else {
                Duration::ZERO
            },
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.max_jitter = Duration::ZERO;
        self
    }

    /// Total attempts allowed, including the first
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Draw a jitter value in `0..=max_jitter`
    pub fn sample_jitter(&self) -> Duration {
        let max = self.max_jitter.as_millis() as u64;
        if max == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..=max))
    }

    /// Backoff before the attempt following `attempt` (zero based)
    pub fn delay_for(&self, attempt: u32, jitter: Duration) -> Duration {
        backoff_delay(
            attempt,
            self.base_delay,
            self.backoff_multiplier,
            self.max_delay,
            jitter,
        )
    }
}

/// `min(base * multiplier^attempt + jitter, max)`
pub fn backoff_delay(
    attempt: u32,
    base: Duration,
    multiplier: f64,
    max: Duration,
    jitter: Duration,
) -> Duration {
    let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
    let scaled = base.as_millis() as f64 * multiplier.powi(exponent);
    let max_ms = max.as_millis() as f64;
    let delay_ms = (scaled + jitter.as_millis() as f64).min(max_ms);
    if delay_ms.is_finite() && delay_ms > 0.0 {
        Duration::from_millis(delay_ms as u64)
    } else if delay_ms.is_nan() {
        max
    } else {
        Duration::ZERO
    }
}
