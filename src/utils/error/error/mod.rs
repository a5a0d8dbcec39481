//! Error handling for the Gateway
//!
//! This module defines all error types used throughout the gateway.

mod conversions;
mod helpers;
mod response;
mod types;

pub use response::{ErrorDetail, ErrorResponse};
pub use types::{GatewayError, Result};
