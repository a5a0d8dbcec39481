//! Fixed-window admission controller

use super::types::{RateLimitDecision, RateWindow};
use crate::config::models::rate_limit::RateLimitConfig;
use crate::core::clock::Clock;
use crate::storage::RateLimitStore;
use crate::utils::error::Result;
use std::sync::Arc;
use tracing::{debug, warn};

/// Decides whether an identity may start another request in its current window
pub struct AdmissionController {
    store: Arc<dyn RateLimitStore>,
    clock: Arc<dyn Clock>,
    config: RateLimitConfig,
}

impl AdmissionController {
    pub fn new(
        store: Arc<dyn RateLimitStore>,
        clock: Arc<dyn Clock>,
        config: RateLimitConfig,
    ) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Name of the backing store
    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    /// Consume one admission for `identity` if its window has room.
    ///
    /// Read failures of the store count as "no window"; a failed increment is
    /// returned as an error and never treated as an admission.
    pub async fn enqueue_request(&self, identity: &str) -> Result<RateLimitDecision> {
        let now = self.clock.now_ms();
        let limit = self.config.max_requests_per_window;

        let window = match self.load_window(identity).await {
            Some(window) if !window.is_expired(now) => window,
            _ => self.start_window(identity, now).await,
        };
        let reset_at = window.window_end_ms();

        if window.request_count >= limit {
            let decision = RateLimitDecision::denied(reset_at, now, limit);
            debug!(
                identity,
                count = window.request_count,
                retry_after = ?decision.retry_after_secs,
                "Rate limit exceeded"
            );
            return Ok(decision);
        }

        let new_count = self
            .store
            .increment(&self.count_key(identity), Some(self.ttl_secs()))
            .await?;
        let used = u32::try_from(new_count.max(0)).unwrap_or(u32::MAX);
        let remaining = limit.saturating_sub(used);

        debug!(identity, count = used, remaining, "Request admitted");
        Ok(RateLimitDecision::allowed(remaining, reset_at, limit))
    }

    /// Report what [`enqueue_request`](Self::enqueue_request) would see without
    /// consuming an admission
    pub async fn check_rate_limit(&self, identity: &str) -> RateLimitDecision {
        let now = self.clock.now_ms();
        let limit = self.config.max_requests_per_window;

        match self.load_window(identity).await {
            Some(window) if !window.is_expired(now) => {
                let reset_at = window.window_end_ms();
                if window.request_count >= limit {
                    RateLimitDecision::denied(reset_at, now, limit)
                } else {
                    RateLimitDecision::allowed(limit - window.request_count, reset_at, limit)
                }
            }
            _ => RateLimitDecision::allowed(limit, now.saturating_add(self.config.window_ms), limit),
        }
    }

    /// Expire the window of `identity` so its next request starts a fresh one
    pub async fn reset_rate_limit(&self, identity: &str) {
        self.store.set(&self.window_key(identity), "0", Some(1)).await;
        self.store.set(&self.count_key(identity), "0", Some(1)).await;
        debug!(identity, "Rate limit reset");
    }

    /// Current stored window for `identity`, expired or not
    pub async fn window(&self, identity: &str) -> Option<RateWindow> {
        self.load_window(identity).await
    }

    async fn load_window(&self, identity: &str) -> Option<RateWindow> {
        let window_key = self.window_key(identity);
        let raw_start = self.store.get(&window_key).await?;
        let window_start_ms = match raw_start.parse::<u64>() {
            Ok(start) => start,
            Err(_) => {
                warn!(key = %window_key, value = %raw_start, "Unreadable window start, starting a new window");
                return None;
            }
        };

        let request_count = match self.store.get(&self.count_key(identity)).await {
            Some(raw) => raw.parse::<u32>().unwrap_or_else(|_| {
                warn!(identity, value = %raw, "Unreadable request count, treating as 0");
                0
            }),
            None => 0,
        };

        Some(RateWindow {
            identity: identity.to_string(),
            window_start_ms,
            request_count,
            window_duration_ms: self.config.window_ms,
        })
    }

    async fn start_window(&self, identity: &str, now: u64) -> RateWindow {
        let ttl = Some(self.ttl_secs());
        self.store
            .set(&self.window_key(identity), &now.to_string(), ttl)
            .await;
        self.store.set(&self.count_key(identity), "0", ttl).await;

        RateWindow {
            identity: identity.to_string(),
            window_start_ms: now,
            request_count: 0,
            window_duration_ms: self.config.window_ms,
        }
    }

    fn ttl_secs(&self) -> u64 {
        self.config.window_ms.div_ceil(1000).max(1)
    }

    fn window_key(&self, identity: &str) -> String {
        format!("{}:{}:window", self.config.key_prefix, identity)
    }

    fn count_key(&self, identity: &str) -> String {
        format!("{}:{}:count", self.config.key_prefix, identity)
    }
}
