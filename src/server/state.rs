//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::clock::{Clock, SystemClock};
use crate::core::completion::CompletionGatewayClient;
use crate::core::rate_limiter::AdmissionController;
use crate::storage;
use crate::utils::error::Result;
use std::sync::Arc;
use tracing::info;

/// HTTP server state
///
/// Built once at bootstrap and handed to every handler, so tests can swap in
/// a fake store or transport.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration (shared read-only)
    pub config: Arc<Config>,
    /// Per-identity admission control
    pub limiter: Arc<AdmissionController>,
    /// Upstream completion client
    pub client: Arc<CompletionGatewayClient>,
}

impl AppState {
    pub fn new(
        config: Config,
        limiter: AdmissionController,
        client: CompletionGatewayClient,
    ) -> Self {
        Self {
            config: Arc::new(config),
            limiter: Arc::new(limiter),
            client: Arc::new(client),
        }
    }

    /// Select the rate-limit store and build the client from configuration
    pub async fn from_config(config: Config) -> Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let store = storage::select_store(config.storage(), config.rate_limit(), clock.clone()).await;
        let limiter = AdmissionController::new(store, clock, config.rate_limit().clone());
        let client = CompletionGatewayClient::from_config(config.provider(), config.retry())?;

        info!(
            store = limiter.store_name(),
            limit = config.rate_limit().max_requests_per_window,
            window_ms = config.rate_limit().window_ms,
            "Application state initialized"
        );

        Ok(Self::new(config, limiter, client))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
