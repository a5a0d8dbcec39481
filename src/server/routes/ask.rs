//! `POST /api/ask`: admission-controlled streaming completion

use super::{identity, rate_limit_headers};
use crate::core::completion::{ChatMessage, CompletionOptions, MessageRole, ToolDefinition};
use crate::core::rate_limiter::RateLimitDecision;
use crate::server::sse;
use crate::server::state::AppState;
use crate::utils::error::{GatewayError, Result};
use actix_web::http::header::{
    CACHE_CONTROL, CONTENT_TYPE, HeaderName, HeaderValue, RETRY_AFTER,
};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Largest `maxTokens` a caller may request
pub const MAX_TOKENS_LIMIT: u32 = 4000;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(default, alias = "tools")]
    pub functions: Option<Vec<ToolDefinition>>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl AskRequest {
    pub fn validate(&self) -> Result<()> {
        if self.messages.is_empty() {
            return Err(GatewayError::validation("At least one message is required"));
        }
        for (i, message) in self.messages.iter().enumerate() {
            let has_tool_calls = message.tool_calls.as_ref().is_some_and(|c| !c.is_empty());
            if message.content.is_none() && !(message.role == MessageRole::Assistant && has_tool_calls)
            {
                return Err(GatewayError::validation(format!(
                    "messages[{}].content is required",
                    i
                )));
            }
        }
        if let Some(model) = &self.model {
            if model.trim().is_empty() {
                return Err(GatewayError::validation("model must not be empty"));
            }
        }
        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(GatewayError::validation(
                    "temperature must be between 0 and 2",
                ));
            }
        }
        if let Some(max_tokens) = self.max_tokens {
            if !(1..=MAX_TOKENS_LIMIT).contains(&max_tokens) {
                return Err(GatewayError::validation(format!(
                    "maxTokens must be between 1 and {}",
                    MAX_TOKENS_LIMIT
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RateLimitedBody {
    error: &'static str,
    message: &'static str,
    retry_after: Option<u64>,
    reset_at: u64,
}

pub async fn ask(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let identity = identity(&req)?;

    let request: AskRequest = serde_json::from_slice(&body)
        .map_err(|e| GatewayError::validation(format!("Request body validation failed: {}", e)))?;
    if let Err(e) = request.validate() {
        warn!(identity = %identity, error = %e, "Invalid ask request");
        return Err(e);
    }

    let decision = state.limiter.enqueue_request(&identity).await?;
    if !decision.allowed {
        info!(identity = %identity, retry_after = ?decision.retry_after_secs, "Ask request rate limited");
        return Ok(rate_limited(&decision));
    }

    let cancel = CancellationToken::new();
    let mut options = CompletionOptions::default().with_cancel(cancel.clone());
    options.model = request.model;
    options.temperature = request.temperature;
    options.max_tokens = request.max_tokens;

    let stream = match state
        .client
        .ask_completion(request.messages, request.functions, options)
        .await
    {
        Ok(stream) => stream,
        Err(e) => {
            if e.is_aborted() {
                debug!(identity = %identity, "Ask request aborted before streaming");
            }
            return Ok(with_rate_limit_headers(e.error_response(), &decision));
        }
    };

    let mut response = HttpResponse::Ok();
    rate_limit_headers(&mut response, &decision);
    Ok(response
        .insert_header((CONTENT_TYPE, "text/event-stream"))
        .insert_header((CACHE_CONTROL, "no-cache"))
        .insert_header(("Connection", "keep-alive"))
        .streaming(sse::relay(stream, cancel.drop_guard(), identity)))
}

fn rate_limited(decision: &RateLimitDecision) -> HttpResponse {
    let mut response = HttpResponse::build(StatusCode::TOO_MANY_REQUESTS);
    rate_limit_headers(&mut response, decision);
    if let Some(retry_after) = decision.retry_after_secs {
        response.insert_header((RETRY_AFTER, retry_after.to_string()));
    }
    response.json(RateLimitedBody {
        error: "Rate limit exceeded",
        message: "Too many requests. Please try again later.",
        retry_after: decision.retry_after_secs,
        reset_at: decision.reset_at,
    })
}

fn with_rate_limit_headers(mut response: HttpResponse, decision: &RateLimitDecision) -> HttpResponse {
    let headers = response.headers_mut();
    for (name, value) in [
        ("x-ratelimit-limit", decision.limit.to_string()),
        ("x-ratelimit-remaining", decision.remaining.to_string()),
        ("x-ratelimit-reset", decision.reset_at.to_string()),
    ] {
        if let Ok(value) = HeaderValue::from_str(&value) {
            headers.insert(HeaderName::from_static(name), value);
        }
    }
    response
}
