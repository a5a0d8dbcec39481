//! Rate limit status and reset endpoints

use super::{identity, is_admin, rate_limit_headers};
use crate::server::state::AppState;
use crate::utils::error::{GatewayError, Result};
use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::info;

/// `GET /api/rate-limit`: current decision for the caller, without consuming
pub async fn rate_limit_status(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let identity = identity(&req)?;
    let decision = state.limiter.check_rate_limit(&identity).await;

    let mut response = HttpResponse::Ok();
    rate_limit_headers(&mut response, &decision);
    Ok(response.json(decision))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetRequest {
    /// Identity to reset, defaults to the caller
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct ResetResponse {
    success: bool,
    message: String,
}

/// `POST /api/reset-rate-limit`: callers may reset themselves, admins anyone
pub async fn reset_rate_limit(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let caller = identity(&req)?;
    let request: ResetRequest = if body.is_empty() {
        ResetRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| GatewayError::validation(format!("Invalid request body: {}", e)))?
    };

    let target = request
        .user_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| caller.clone());

    if target != caller && !is_admin(&req) {
        return Err(GatewayError::forbidden(
            "Only admins can reset rate limits for other users",
        ));
    }

    state.limiter.reset_rate_limit(&target).await;
    info!(caller = %caller, target = %target, "Rate limit reset");

    Ok(HttpResponse::Ok().json(ResetResponse {
        success: true,
        message: format!("Rate limit reset for user {}", target),
    }))
}
