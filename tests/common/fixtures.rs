//! Test fixtures
//!
//! Everything here builds real components on in-memory storage and virtual
//! time. Upstreams are `wiremock` servers.

use completion_gateway::config::{ProviderConfig, RateLimitConfig};
use completion_gateway::{
    AdmissionController, CompletionGatewayClient, HttpTransport, ManualClock, MemoryStore,
    RetryPolicy, VirtualSleeper,
};
use std::sync::Arc;
use std::time::Duration;

/// Fixed start time for virtual clocks
pub const START_MS: u64 = 1_700_000_000_000;

/// Admission controller on a fresh memory store and a manual clock
pub fn admission_controller(max: u32, window_ms: u64) -> (Arc<ManualClock>, AdmissionController) {
    let clock = Arc::new(ManualClock::new(START_MS));
    let store = Arc::new(MemoryStore::new(clock.clone()));
    let config = RateLimitConfig {
        max_requests_per_window: max,
        window_ms,
        ..Default::default()
    };
    (clock.clone(), AdmissionController::new(store, clock, config))
}

/// SSE body with one content chunk per part, without the `[DONE]` marker
pub fn chunk_sse(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| {
            let chunk = serde_json::json!({
                "id": "chatcmpl-it",
                "object": "chat.completion.chunk",
                "created": 1,
                "model": "gpt-4",
                "choices": [{"index": 0, "delta": {"content": part}, "finish_reason": null}]
            });
            format!("data: {}\n\n", chunk)
        })
        .collect()
}

/// Client over HTTP against a mock upstream, with recorded virtual backoff
pub struct TestClient {
    pub client: CompletionGatewayClient,
    pub sleeper: Arc<VirtualSleeper>,
}

impl TestClient {
    pub fn new(api_base: &str, api_key: Option<&str>) -> Self {
        let provider = ProviderConfig {
            api_key: api_key.map(str::to_string),
            api_base: api_base.to_string(),
            timeout_secs: 5,
            ..Default::default()
        };
        let policy = RetryPolicy::default()
            .with_max_retries(3)
            .with_base_delay(Duration::from_millis(1_000))
            .with_max_delay(Duration::from_millis(10_000))
            .without_jitter();

        let transport = HttpTransport::new(&provider).expect("transport");
        let sleeper = Arc::new(VirtualSleeper::new());
        let client =
            CompletionGatewayClient::new(Arc::new(transport), sleeper.clone(), policy, &provider);
        Self { client, sleeper }
    }
}
