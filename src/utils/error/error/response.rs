//! HTTP response handling for errors

use super::types::GatewayError;
use crate::core::completion::UpstreamError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

/// Nginx-style status for a request the client abandoned
const CLIENT_CLOSED_REQUEST: u16 = 499;

impl GatewayError {
    /// Status code, machine-readable code and a message that is safe to show
    /// to end users
    fn http_parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            GatewayError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                self.to_string(),
            ),
            GatewayError::Storage(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORAGE_UNAVAILABLE",
                "Rate limit storage is unavailable".to_string(),
            ),
            #[cfg(feature = "redis")]
            GatewayError::Redis(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORAGE_UNAVAILABLE",
                "Rate limit storage is unavailable".to_string(),
            ),
            GatewayError::Upstream(upstream) => match upstream {
                UpstreamError::Status { status, .. } if *status == 401 || *status == 403 => (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_AUTH_ERROR",
                    "The completion provider rejected the gateway credentials".to_string(),
                ),
                UpstreamError::Status { status, .. } => (
                    StatusCode::from_u16(*status)
                        .ok()
                        .filter(|s| s.is_client_error())
                        .unwrap_or(StatusCode::BAD_GATEWAY),
                    "UPSTREAM_ERROR",
                    upstream.to_string(),
                ),
                _ => (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    upstream.to_string(),
                ),
            },
            GatewayError::RetriesExhausted { .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "UPSTREAM_UNAVAILABLE",
                self.to_string(),
            ),
            GatewayError::Aborted => (
                StatusCode::from_u16(CLIENT_CLOSED_REQUEST).unwrap_or(StatusCode::BAD_REQUEST),
                "REQUEST_ABORTED",
                self.to_string(),
            ),
            GatewayError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                self.to_string(),
            ),
            GatewayError::Unauthorized(_) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                self.to_string(),
            ),
            GatewayError::Forbidden(_) => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                self.to_string(),
            ),
            GatewayError::Serialization(_) | GatewayError::Io(_) | GatewayError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        }
    }
}

impl GatewayError {
    /// Message safe to relay to end users, e.g. inside an SSE error event
    pub fn public_message(&self) -> String {
        self.http_parts().2
    }
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        self.http_parts().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = self.http_parts();

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: error_code.to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
            },
        };

        HttpResponse::build(status_code).json(error_response)
    }
}

/// Standard error response format
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
}
