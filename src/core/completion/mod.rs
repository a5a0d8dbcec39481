//! Streaming completion client
//!
//! [`CompletionGatewayClient`] sends OpenAI-format chat completion requests
//! through a [`CompletionTransport`], retrying transient failures with
//! exponential backoff and honouring a per-call cancellation token.
//!
//! # Example
//! ```ignore
//! use completion_gateway::core::completion::{
//!     collect_streaming_response, ChatMessage, CompletionGatewayClient, CompletionOptions,
//! };
//!
//! let client = CompletionGatewayClient::from_config(&config.gateway.provider, &config.gateway.retry)?;
//! let stream = client
//!     .ask_completion(vec![ChatMessage::user("Hello!")], None, CompletionOptions::default())
//!     .await?;
//! let text = collect_streaming_response(stream).await?;
//! ```

mod client;
mod error;
mod sse;
mod stream;
mod transport;
mod types;


pub use client::{CompletionGatewayClient, collect_streaming_response};
pub use error::{TransportErrorKind, UpstreamError};
pub use sse::{DONE_MARKER, SseFrame, SseParser};
pub use stream::CompletionStream;
pub use transport::{ByteStream, CompletionTransport, HttpTransport, with_idle_timeout};
pub use types::{
    ChatCompletion, ChatCompletionChunk, ChatDelta, ChatMessage, Choice, ChunkAggregator,
    ChunkChoice, CompletionOptions, FunctionCall, FunctionCallDelta, FunctionDefinition,
    MessageRole, StreamRequest, ToolCall, ToolCallDelta, ToolDefinition, Usage,
};
