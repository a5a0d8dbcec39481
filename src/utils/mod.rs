//! Shared utilities
//!
//! - **error**: gateway error taxonomy and its HTTP mapping
//! - **logging**: tracing subscriber setup

pub mod error;
pub mod logging;

pub use error::{GatewayError, Result};
