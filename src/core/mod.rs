//! Core gateway functionality
//!
//! - [`rate_limiter`]: per-identity fixed-window admission control
//! - [`completion`]: streaming completion client with retry and cancellation
//! - [`retry`]: backoff policy and the retry state machine
//! - [`clock`]: time sources shared by the modules above

pub mod clock;
pub mod completion;
pub mod rate_limiter;
pub mod retry;
