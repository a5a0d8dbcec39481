//! # completion-gateway
//!
//! Admission control and a resilient streaming completion client for the
//! bot admin platform.
//!
//! Every request carries an identity. The [`AdmissionController`] admits at
//! most `max_requests` per identity inside a fixed window, backed by Redis or
//! an in-process map. Admitted requests go through the
//! [`CompletionGatewayClient`], which opens a streaming chat completion,
//! retries transient upstream failures with exponential backoff and stops
//! promptly when the caller cancels.
//!
//! ## Library use
//!
//! ```rust,no_run
//! use completion_gateway::{ChatMessage, CompletionGatewayClient, CompletionOptions, Config};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let client = CompletionGatewayClient::from_config(config.provider(), config.retry())?;
//!
//!     let mut stream = client
//!         .ask_completion(
//!             vec![ChatMessage::user("Hello!")],
//!             None,
//!             CompletionOptions::default(),
//!         )
//!         .await?;
//!
//!     while let Some(chunk) = stream.next().await {
//!         print!("{}", chunk?.content().unwrap_or_default());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Server mode
//!
//! ```rust,no_run
//! use completion_gateway::{Config, server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/gateway.yaml").await?;
//!     server::run_server(config).await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod server;
pub mod storage;
pub mod utils;

pub use config::Config;
pub use utils::error::{GatewayError, Result};

pub use core::clock::{Clock, ManualClock, Sleeper, SystemClock, TokioSleeper, VirtualSleeper};
pub use core::completion::{
    ChatCompletion, ChatCompletionChunk, ChatMessage, CompletionGatewayClient, CompletionOptions,
    CompletionStream, CompletionTransport, HttpTransport, MessageRole, ToolDefinition,
    UpstreamError, collect_streaming_response,
};
pub use core::rate_limiter::{AdmissionController, RateLimitDecision, RateWindow};
pub use core::retry::{RetryMachine, RetryPolicy, RetryState};
pub use storage::{MemoryStore, RateLimitStore};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
