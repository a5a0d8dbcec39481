//! Per-request retry state machine
//!
//! ```text
//! Pending -> Attempting -> Succeeded
//!                |-> Backoff -> Attempting ...
//!                |-> Exhausted | Failed | Aborted
//! ```
//!
//! `Aborted` and `Failed` are reached without retrying. `Exhausted` is reached
//! after `max_retries + 1` attempts have all failed with retryable errors.

use super::policy::RetryPolicy;
use crate::core::completion::UpstreamError;
use crate::utils::error::GatewayError;
use std::time::Duration;

/// Where a logical request currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Pending,
    /// Attempt `attempt` (zero based) is in flight
    Attempting { attempt: u32 },
    /// Attempt `attempt` failed and the next one starts after `delay`
    Backoff { attempt: u32, delay: Duration },
    Succeeded { attempts: u32 },
    Exhausted { attempts: u32 },
    Aborted,
    Failed { attempts: u32 },
}

impl RetryState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Succeeded { .. } | Self::Exhausted { .. } | Self::Aborted | Self::Failed { .. }
        )
    }
}

/// What the caller should do after a failed attempt
#[derive(Debug)]
pub enum FailureOutcome {
    /// Sleep for the delay, then call [`RetryMachine::begin_attempt`] again
    Retry(Duration),
    /// Stop and surface the error
    GiveUp(GatewayError),
}

/// Drives one logical request through [`RetryState`]
#[derive(Debug)]
pub struct RetryMachine {
    policy: RetryPolicy,
    state: RetryState,
}

impl RetryMachine {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            state: RetryState::Pending,
        }
    }

    pub fn state(&self) -> RetryState {
        self.state
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Move into `Attempting`, returning the zero-based attempt number.
    ///
    /// A signalled cancellation moves the machine to `Aborted` instead and
    /// returns [`GatewayError::Aborted`].
    pub fn begin_attempt(&mut self, cancelled: bool) -> Result<u32, GatewayError> {
        if cancelled {
            self.state = RetryState::Aborted;
            return Err(GatewayError::Aborted);
        }

        let attempt = match self.state {
            RetryState::Pending => 0,
            RetryState::Backoff { attempt, .. } => attempt + 1,
            other => {
                return Err(GatewayError::internal(format!(
                    "cannot start an attempt from state {other:?}"
                )));
            }
        };
        self.state = RetryState::Attempting { attempt };
        Ok(attempt)
    }

    pub fn record_success(&mut self) {
        if let RetryState::Attempting { attempt } = self.state {
            self.state = RetryState::Succeeded {
                attempts: attempt + 1,
            };
        }
    }

    /// Cancellation observed while an attempt or a backoff sleep was pending
    pub fn record_abort(&mut self) -> GatewayError {
        self.state = RetryState::Aborted;
        GatewayError::Aborted
    }

    /// Classify a failed attempt; `jitter` is added to the backoff if one follows
    pub fn record_failure(&mut self, error: UpstreamError, jitter: Duration) -> FailureOutcome {
        let attempt = match self.state {
            RetryState::Attempting { attempt } => attempt,
            _ => 0,
        };
        let attempts = attempt + 1;

        if !error.is_retryable() {
            self.state = RetryState::Failed { attempts };
            return FailureOutcome::GiveUp(GatewayError::Upstream(error));
        }

        if attempt >= self.policy.max_retries {
            self.state = RetryState::Exhausted { attempts };
            return FailureOutcome::GiveUp(GatewayError::RetriesExhausted {
                attempts,
                last: Box::new(error),
            });
        }

        let delay = self.policy.delay_for(attempt, jitter);
        self.state = RetryState::Backoff { attempt, delay };
        FailureOutcome::Retry(delay)
    }
}
