//! Admission control types

use serde::{Deserialize, Serialize};

/// Outcome of an admission check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitDecision {
    /// Whether the request is admitted
    pub allowed: bool,
    /// Admissions left in the current window
    pub remaining: u32,
    /// Window end, epoch milliseconds
    pub reset_at: u64,
    /// Seconds until the window resets, only set when denied
    #[serde(rename = "retryAfter", skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
    /// Admissions per window
    pub limit: u32,
}

impl RateLimitDecision {
    pub(super) fn allowed(remaining: u32, reset_at: u64, limit: u32) -> Self {
        Self {
            allowed: true,
            remaining,
            reset_at,
            retry_after_secs: None,
            limit,
        }
    }

    pub(super) fn denied(reset_at: u64, now_ms: u64, limit: u32) -> Self {
        Self {
            allowed: false,
            remaining: 0,
            reset_at,
            retry_after_secs: Some(reset_at.saturating_sub(now_ms).div_ceil(1000)),
            limit,
        }
    }
}

/// Stored window state for one identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateWindow {
    pub identity: String,
    pub window_start_ms: u64,
    pub request_count: u32,
    pub window_duration_ms: u64,
}

impl RateWindow {
    pub fn window_end_ms(&self) -> u64 {
        self.window_start_ms.saturating_add(self.window_duration_ms)
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.window_end_ms()
    }
}
