//! Completion client with bounded retry and cancellation

use super::error::UpstreamError;
use super::stream::CompletionStream;
use super::transport::{CompletionTransport, HttpTransport};
use super::types::{
    ChatCompletion, ChatMessage, ChunkAggregator, CompletionOptions, StreamRequest, ToolDefinition,
};
use crate::config::models::provider::ProviderConfig;
use crate::config::models::retry::RetryConfig;
use crate::core::clock::{Sleeper, TokioSleeper};
use crate::core::retry::{FailureOutcome, RetryMachine, RetryPolicy};
use crate::utils::error::Result;
use futures::StreamExt;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// Issues completion requests against one provider
pub struct CompletionGatewayClient {
    transport: Arc<dyn CompletionTransport>,
    sleeper: Arc<dyn Sleeper>,
    retry: RetryPolicy,
    default_model: String,
    default_temperature: f32,
}

impl CompletionGatewayClient {
    pub fn new(
        transport: Arc<dyn CompletionTransport>,
        sleeper: Arc<dyn Sleeper>,
        retry: RetryPolicy,
        provider: &ProviderConfig,
    ) -> Self {
        Self {
            transport,
            sleeper,
            retry,
            default_model: provider.default_model.clone(),
            default_temperature: provider.default_temperature,
        }
    }

    /// HTTP transport and real timers from configuration
    pub fn from_config(provider: &ProviderConfig, retry: &RetryConfig) -> Result<Self> {
        let transport = HttpTransport::new(provider)?;
        Ok(Self::new(
            Arc::new(transport),
            Arc::new(TokioSleeper),
            RetryPolicy::from(retry),
            provider,
        ))
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Open a streaming completion.
    ///
    /// Retries cover opening the stream. Once it is returned, failures while
    /// reading it end the stream with an error item.
    pub async fn ask_completion(
        &self,
        messages: Vec<ChatMessage>,
        tools: Option<Vec<ToolDefinition>>,
        options: CompletionOptions,
    ) -> Result<CompletionStream> {
        let (request, policy) = self.build_request(messages, tools, options, true);
        let transport = self.transport.as_ref();
        let request_ref = &request;

        let body = self
            .run_with_retry(policy, &request.cancel, || transport.open_stream(request_ref))
            .await?;
        Ok(CompletionStream::from_sse(body, request.cancel.clone()))
    }

    /// Non-streaming request returning the provider's single completion object
    pub async fn ask_completion_unary(
        &self,
        messages: Vec<ChatMessage>,
        tools: Option<Vec<ToolDefinition>>,
        options: CompletionOptions,
    ) -> Result<ChatCompletion> {
        let (request, policy) = self.build_request(messages, tools, options, false);
        let transport = self.transport.as_ref();
        let request_ref = &request;

        self.run_with_retry(policy, &request.cancel, || transport.complete(request_ref))
            .await
    }

    /// Stream a completion and fold it into a single [`ChatCompletion`]
    pub async fn ask_completion_aggregate(
        &self,
        messages: Vec<ChatMessage>,
        tools: Option<Vec<ToolDefinition>>,
        options: CompletionOptions,
    ) -> Result<ChatCompletion> {
        let mut stream = self.ask_completion(messages, tools, options).await?;
        let mut aggregator = ChunkAggregator::default();
        while let Some(chunk) = stream.next().await {
            aggregator.push(&chunk?);
        }
        Ok(aggregator.finish())
    }

    fn build_request(
        &self,
        messages: Vec<ChatMessage>,
        tools: Option<Vec<ToolDefinition>>,
        options: CompletionOptions,
        stream: bool,
    ) -> (StreamRequest, RetryPolicy) {
        let policy = options.retry.unwrap_or_else(|| self.retry.clone());
        let request = StreamRequest {
            model: options
                .model
                .unwrap_or_else(|| self.default_model.clone()),
            messages,
            temperature: options.temperature.unwrap_or(self.default_temperature),
            max_tokens: options.max_tokens,
            stream,
            tools: tools.filter(|t| !t.is_empty()),
            cancel: options.cancel.unwrap_or_default(),
        };
        (request, policy)
    }

    /// Drive `attempt` through the retry state machine
    async fn run_with_retry<T, F, Fut>(
        &self,
        policy: RetryPolicy,
        cancel: &CancellationToken,
        mut attempt: F,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, UpstreamError>>,
    {
        self.transport.ensure_configured()?;

        let mut machine = RetryMachine::new(policy);
        loop {
            let number = match machine.begin_attempt(cancel.is_cancelled()) {
                Ok(number) => number,
                Err(err) => {
                    debug!("Completion request aborted before attempt");
                    return Err(err);
                }
            };
            let max_attempts = machine.policy().max_attempts();

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                result = attempt() => Some(result),
            };

            let err = match result {
                None => {
                    debug!(attempt = number + 1, "Completion request aborted in flight");
                    return Err(machine.record_abort());
                }
                Some(Ok(value)) => {
                    machine.record_success();
                    if number > 0 {
                        debug!(attempts = number + 1, "Completion request succeeded after retry");
                    }
                    return Ok(value);
                }
                Some(Err(err)) => err,
            };

            let jitter = machine.policy().sample_jitter();
            match machine.record_failure(err.clone(), jitter) {
                FailureOutcome::Retry(delay) => {
                    warn!(
                        attempt = number + 1,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Completion attempt failed, retrying"
                    );
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            debug!("Completion request aborted during backoff");
                            return Err(machine.record_abort());
                        }
                        _ = self.sleeper.sleep(delay) => {}
                    }
                }
                FailureOutcome::GiveUp(failure) => {
                    error!(attempt = number + 1, error = %failure, "Completion request failed");
                    return Err(failure);
                }
            }
        }
    }
}

/// Concatenate the text deltas of a stream
pub async fn collect_streaming_response(mut stream: CompletionStream) -> Result<String> {
    let mut text = String::new();
    while let Some(chunk) = stream.next().await {
        if let Some(content) = chunk?.content() {
            text.push_str(content);
        }
    }
    Ok(text)
}

impl std::fmt::Debug for CompletionGatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionGatewayClient")
            .field("retry", &self.retry)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .finish()
    }
}

