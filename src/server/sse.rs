//! Relay of a completion stream as Server-Sent Events

use crate::utils::error::{GatewayError, Result};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde::Serialize;
use tokio_util::sync::DropGuard;
use tracing::{debug, error, info};

/// `data: <payload>\n\n`
pub fn event(payload: &str) -> Bytes {
    Bytes::from(format!("data: {}\n\n", payload))
}

pub fn done_event() -> Bytes {
    event(crate::core::completion::DONE_MARKER)
}

/// Error event sent once streaming has begun
pub fn error_event(err: &GatewayError) -> Bytes {
    event(&serde_json::json!({ "error": err.public_message() }).to_string())
}

/// Turn a completion stream into an SSE body.
///
/// `guard` cancels the upstream request when the body is dropped, which is
/// how a client disconnect reaches the provider call. A chunk that cannot be
/// encoded ends the body with an error event.
pub fn relay<S, T>(
    stream: S,
    guard: DropGuard,
    identity: String,
) -> impl Stream<Item = Result<Bytes>>
where
    S: Stream<Item = Result<T>> + 'static,
    T: Serialize,
{
    async_stream::stream! {
        let _guard = guard;
        let mut stream = Box::pin(stream);
        let mut chunks = 0usize;
        let mut completed = true;

        while let Some(item) = stream.next().await {
            match item {
                Ok(chunk) => match serde_json::to_string(&chunk) {
                    Ok(json) => {
                        chunks += 1;
                        yield Ok::<_, GatewayError>(event(&json));
                    }
                    Err(e) => {
                        error!(identity = %identity, chunks, error = %e, "Failed to serialize chunk");
                        yield Ok::<_, GatewayError>(error_event(&GatewayError::from(e)));
                        completed = false;
                        break;
                    }
                },
                Err(e) if e.is_aborted() => {
                    debug!(identity = %identity, chunks, "Stream aborted");
                    completed = false;
                    break;
                }
                Err(e) => {
                    error!(identity = %identity, chunks, error = %e, "Stream error");
                    yield Ok::<_, GatewayError>(error_event(&e));
                    completed = false;
                    break;
                }
            }
        }

        if completed {
            yield Ok::<_, GatewayError>(done_event());
            info!(identity = %identity, chunks, "Streamed completion");
        }
    }
}
