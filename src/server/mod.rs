//! HTTP server implementation
//!
//! The route layer admits each request through the
//! [`AdmissionController`](crate::core::rate_limiter::AdmissionController)
//! before handing it to the completion client and relaying the stream.

pub mod routes;
pub mod server;
pub mod sse;
pub mod state;


pub use server::HttpServer;
pub use state::AppState;

use crate::config::Config;
use crate::utils::error::Result;

/// Build the server from `config` and run it until shutdown
pub async fn run_server(config: Config) -> Result<()> {
    HttpServer::new(&config).await?.start().await
}
