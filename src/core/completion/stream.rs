//! Lazy, finite sequence of completion chunks
//!
//! A [`CompletionStream`] owns the response body of one successful attempt.
//! It ends after the `[DONE]` marker, after the first error, or when its
//! cancellation token fires. It cannot be restarted. Dropping or
//! [`close`](CompletionStream::close)-ing it releases the connection.

use super::error::UpstreamError;
use super::sse::{SseFrame, SseParser};
use super::transport::ByteStream;
use super::types::ChatCompletionChunk;
use crate::utils::error::{GatewayError, Result};
use futures::stream::{FusedStream, Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio_util::sync::CancellationToken;
use tracing::debug;

type ChunkStream = Pin<Box<dyn Stream<Item = Result<ChatCompletionChunk>> + Send>>;

/// Streamed completion chunks in provider order
pub struct CompletionStream {
    inner: Option<ChunkStream>,
    cancel: CancellationToken,
}

impl CompletionStream {
    /// Decode an SSE body into chunks, stopping on `cancel`
    pub fn from_sse(body: ByteStream, cancel: CancellationToken) -> Self {
        let token = cancel.clone();
        let chunks = async_stream::stream! {
            let mut body = body;
            let mut parser = SseParser::new();
            let mut finished = false;
            let mut body_ended = false;

            'read: loop {
                let next = tokio::select! {
                    biased;
                    _ = token.cancelled() => None,
                    item = body.next() => Some(item),
                };

                let frames = match next {
                    None => {
                        debug!("Completion stream cancelled");
                        yield Err(GatewayError::Aborted);
                        break 'read;
                    }
                    Some(Some(Ok(bytes))) => parser.push(&bytes),
                    Some(Some(Err(e))) => {
                        yield Err(GatewayError::Upstream(e));
                        break 'read;
                    }
                    Some(None) => {
                        body_ended = true;
                        parser.finish().into_iter().collect()
                    }
                };

                for frame in frames {
                    if token.is_cancelled() {
                        debug!("Completion stream cancelled");
                        yield Err(GatewayError::Aborted);
                        break 'read;
                    }
                    match frame {
                        SseFrame::Done => {
                            finished = true;
                            break 'read;
                        }
                        SseFrame::Data(data) => match serde_json::from_str::<ChatCompletionChunk>(&data) {
                            Ok(chunk) => yield Ok(chunk),
                            Err(e) => {
                                yield Err(GatewayError::Upstream(UpstreamError::protocol(format!(
                                    "invalid stream chunk: {}",
                                    e
                                ))));
                                break 'read;
                            }
                        },
                    }
                }

                if body_ended {
                    break 'read;
                }
            }

            if body_ended && !finished {
                yield Err(GatewayError::Upstream(UpstreamError::protocol(
                    "stream ended before [DONE]",
                )));
            }
        };

        Self::from_chunks(chunks, cancel)
    }

    /// Wrap an already decoded chunk stream
    pub fn from_chunks<S>(chunks: S, cancel: CancellationToken) -> Self
    where
        S: Stream<Item = Result<ChatCompletionChunk>> + Send + 'static,
    {
        Self {
            inner: Some(Box::pin(chunks)),
            cancel,
        }
    }

    /// Token that cancels this stream
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Stop reading and release the underlying connection
    pub fn close(&mut self) {
        self.inner = None;
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }
}

impl Stream for CompletionStream {
    type Item = Result<ChatCompletionChunk>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let Some(inner) = self.inner.as_mut() else {
            return Poll::Ready(None);
        };
        match inner.as_mut().poll_next(cx) {
            Poll::Ready(None) => {
                self.inner = None;
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

impl FusedStream for CompletionStream {
    fn is_terminated(&self) -> bool {
        self.inner.is_none()
    }
}

impl std::fmt::Debug for CompletionStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionStream")
            .field("closed", &self.is_closed())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}
