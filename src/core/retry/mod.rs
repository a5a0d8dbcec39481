//! Bounded retry with exponential backoff
//!
//! [`RetryPolicy`] holds the numbers, [`RetryMachine`] tracks a single logical
//! request through its attempts. The machine never sleeps or performs I/O
//! itself; the caller drives it and owns the suspension points, so tests can
//! step through a whole retry sequence with a virtual sleeper.

mod policy;
mod state;


pub use policy::{RetryPolicy, backoff_delay};
pub use state::{FailureOutcome, RetryMachine, RetryState};
