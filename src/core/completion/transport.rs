//! Provider transport
//!
//! A transport performs exactly one attempt. Retry, backoff and cancellation
//! live in [`CompletionGatewayClient`](super::CompletionGatewayClient).

use super::error::{TransportErrorKind, UpstreamError};
use super::types::{ChatCompletion, StreamRequest};
use crate::config::models::provider::ProviderConfig;
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::fmt;
use std::pin::Pin;
use std::time::Duration;
use tracing::debug;

/// Raw response body of a streaming attempt
pub type ByteStream = Pin<Box<dyn Stream<Item = std::result::Result<Bytes, UpstreamError>> + Send>>;

/// One attempt against the completion provider
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    /// Fail with [`GatewayError::Config`] when the transport cannot be used at all
    fn ensure_configured(&self) -> Result<()>;

    /// Send a streaming request, resolving once the provider accepted it
    async fn open_stream(
        &self,
        request: &StreamRequest,
    ) -> std::result::Result<ByteStream, UpstreamError>;

    /// Send a non-streaming request and decode the single completion object
    async fn complete(
        &self,
        request: &StreamRequest,
    ) -> std::result::Result<ChatCompletion, UpstreamError>;
}

/// OpenAI-compatible HTTPS transport
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
    timeout: Duration,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpTransport {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(|e| GatewayError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            endpoint: format!("{}/chat/completions", config.api_base.trim_end_matches('/')),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send the request and return the response if its status is a success
    async fn send(
        &self,
        request: &StreamRequest,
    ) -> std::result::Result<reqwest::Response, UpstreamError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| UpstreamError::Status {
            status: 401,
            message: "no API key configured".to_string(),
        })?;

        let send = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(request)
            .send();

        let response = tokio::time::timeout(self.timeout, send)
            .await
            .map_err(|_| self.timed_out())?
            .map_err(|e| UpstreamError::from_reqwest(&e))?;

        let status = response.status();
        if status.is_success() {
            debug!(status = status.as_u16(), stream = request.stream, "Provider accepted request");
            return Ok(response);
        }

        let body = tokio::time::timeout(self.timeout, response.text())
            .await
            .ok()
            .and_then(|text| text.ok())
            .unwrap_or_default();
        Err(UpstreamError::from_status(status.as_u16(), &body))
    }

    fn timed_out(&self) -> UpstreamError {
        UpstreamError::transport(
            TransportErrorKind::Timeout,
            format!("no response within {}s", self.timeout.as_secs()),
        )
    }
}

/// End `body` with a timeout error when no bytes arrive for `idle`.
///
/// The stream also stops after the first error item.
pub fn with_idle_timeout(body: ByteStream, idle: Duration) -> ByteStream {
    Box::pin(async_stream::stream! {
        let mut body = body;
        loop {
            match tokio::time::timeout(idle, body.next()).await {
                Err(_) => {
                    yield Err(UpstreamError::transport(
                        TransportErrorKind::Timeout,
                        format!("stream stalled for {}s", idle.as_secs()),
                    ));
                    break;
                }
                Ok(None) => break,
                Ok(Some(item)) => {
                    let failed = item.is_err();
                    yield item;
                    if failed {
                        break;
                    }
                }
            }
        }
    })
}

#[async_trait]
impl CompletionTransport for HttpTransport {
    fn ensure_configured(&self) -> Result<()> {
        if self.api_key.is_none() {
            return Err(GatewayError::config(
                "Missing OPENAI_API_KEY: set provider.api_key or the OPENAI_API_KEY environment variable",
            ));
        }
        Ok(())
    }

    async fn open_stream(
        &self,
        request: &StreamRequest,
    ) -> std::result::Result<ByteStream, UpstreamError> {
        let response = self.send(request).await?;
        let body = response
            .bytes_stream()
            .map(|item| item.map_err(|e| UpstreamError::from_reqwest(&e)));
        Ok(with_idle_timeout(Box::pin(body), self.timeout))
    }

    async fn complete(
        &self,
        request: &StreamRequest,
    ) -> std::result::Result<ChatCompletion, UpstreamError> {
        let response = self.send(request).await?;
        let body = tokio::time::timeout(self.timeout, response.bytes())
            .await
            .map_err(|_| self.timed_out())?
            .map_err(|e| UpstreamError::from_reqwest(&e))?;

        serde_json::from_slice(&body)
            .map_err(|e| UpstreamError::protocol(format!("invalid completion body: {}", e)))
    }
}
