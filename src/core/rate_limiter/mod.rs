//! Per-identity fixed-window admission control
//!
//! Each identity owns two keys in the [`RateLimitStore`](crate::storage::RateLimitStore):
//! `<prefix>:<identity>:window` holds the window start in epoch milliseconds and
//! `<prefix>:<identity>:count` the number of admissions in that window.

mod limiter;
mod types;


pub use limiter::AdmissionController;
pub use types::{RateLimitDecision, RateWindow};
