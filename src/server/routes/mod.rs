//! HTTP route modules
//!
//! Authentication happens upstream of this service: the auth layer forwards
//! the caller's identity in `X-User-Id` and their role in `X-User-Role`.

pub mod ask;
pub mod health;
pub mod rate_limit;

use crate::core::rate_limiter::RateLimitDecision;
use crate::utils::error::{GatewayError, Result};
use actix_web::{HttpRequest, HttpResponseBuilder, web};

/// Header carrying the authenticated identity
pub const USER_ID_HEADER: &str = "X-User-Id";
/// Header carrying the authenticated role
pub const USER_ROLE_HEADER: &str = "X-User-Role";

/// Configure all routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .route("/ask", web::post().to(ask::ask))
                .route("/rate-limit", web::get().to(rate_limit::rate_limit_status))
                .route(
                    "/reset-rate-limit",
                    web::post().to(rate_limit::reset_rate_limit),
                ),
        );
}

/// Identity of the caller, or 401
pub(crate) fn identity(req: &HttpRequest) -> Result<String> {
    req.headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| GatewayError::unauthorized("User authentication required"))
}

pub(crate) fn is_admin(req: &HttpRequest) -> bool {
    req.headers()
        .get(USER_ROLE_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|role| role.trim().eq_ignore_ascii_case("admin"))
}

/// Attach `X-RateLimit-*` headers describing `decision`
pub(crate) fn rate_limit_headers(
    builder: &mut HttpResponseBuilder,
    decision: &RateLimitDecision,
) {
    builder
        .insert_header(("X-RateLimit-Limit", decision.limit.to_string()))
        .insert_header(("X-RateLimit-Remaining", decision.remaining.to_string()))
        .insert_header(("X-RateLimit-Reset", decision.reset_at.to_string()));
}
