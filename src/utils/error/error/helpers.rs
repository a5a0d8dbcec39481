//! Helper functions for creating and inspecting errors

use super::types::GatewayError;

impl GatewayError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn unauthorized<S: Into<String>>(message: S) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden<S: Into<String>>(message: S) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Cancellation is an expected outcome, not a fault
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted)
    }

    /// Upstream status code carried by this error, if any
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream(e) => e.status(),
            Self::RetriesExhausted { last, .. } => last.status(),
            _ => None,
        }
    }
}
