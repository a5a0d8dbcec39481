//! Upstream (completion provider) failures and their retry classification

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Longest provider message carried into logs and user-facing errors
const MAX_MESSAGE_LEN: usize = 300;

/// Transport-level failure class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection reset, refused or aborted
    ConnectionReset,
    /// Connect or read timed out
    Timeout,
    /// Host name could not be resolved
    Dns,
    /// Anything else (TLS, malformed request, redirects)
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportErrorKind::ConnectionReset => "connection reset",
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Dns => "dns failure",
            TransportErrorKind::Other => "transport",
        };
        f.write_str(name)
    }
}

/// A single failed attempt against the completion provider
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpstreamError {
    /// The provider answered with a non-success status
    #[error("provider returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The request never produced a response
    #[error("{kind} error: {message}")]
    Transport {
        kind: TransportErrorKind,
        message: String,
    },

    /// The response did not follow the expected wire format
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl UpstreamError {
    /// Build a status error from the provider's error body.
    ///
    /// OpenAI-style bodies (`{"error": {"message": ...}}`) contribute only their
    /// message; other bodies are truncated.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("error")
                    .and_then(|e| e.get("message").or(Some(e)))
                    .and_then(|m| m.as_str().map(str::to_string))
            })
            .unwrap_or_else(|| body.trim().to_string());

        let message = if message.is_empty() {
            "no error details".to_string()
        } else {
            truncate_message(&message)
        };

        UpstreamError::Status { status, message }
    }

    /// Classify a reqwest failure by walking its source chain
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if let Some(kind) = io_error_kind(err) {
            kind
        } else if err.is_connect() {
            if looks_like_dns_failure(err) {
                TransportErrorKind::Dns
            } else {
                TransportErrorKind::ConnectionReset
            }
        } else {
            TransportErrorKind::Other
        };

        UpstreamError::Transport {
            kind,
            message: truncate_message(&err.to_string()),
        }
    }

    pub fn transport<S: Into<String>>(kind: TransportErrorKind, message: S) -> Self {
        UpstreamError::Transport {
            kind,
            message: message.into(),
        }
    }

    pub fn protocol<S: Into<String>>(message: S) -> Self {
        UpstreamError::Protocol(message.into())
    }

    /// Whether another attempt may succeed: 429, 408, 5xx and
    /// reset/timeout/DNS transport failures
    pub fn is_retryable(&self) -> bool {
        match self {
            UpstreamError::Status { status, .. } => {
                *status == 429 || *status == 408 || *status >= 500
            }
            UpstreamError::Transport { kind, .. } => matches!(
                kind,
                TransportErrorKind::ConnectionReset
                    | TransportErrorKind::Timeout
                    | TransportErrorKind::Dns
            ),
            UpstreamError::Protocol(_) => false,
        }
    }

    /// HTTP status, when the provider answered
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn io_error_kind(err: &reqwest::Error) -> Option<TransportErrorKind> {
    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io) = cause.downcast_ref::<std::io::Error>() {
            use std::io::ErrorKind;
            return match io.kind() {
                ErrorKind::ConnectionReset
                | ErrorKind::ConnectionAborted
                | ErrorKind::ConnectionRefused
                | ErrorKind::BrokenPipe
                | ErrorKind::UnexpectedEof => Some(TransportErrorKind::ConnectionReset),
                ErrorKind::TimedOut => Some(TransportErrorKind::Timeout),
                _ => None,
            };
        }
        source = cause.source();
    }
    None
}

fn looks_like_dns_failure(err: &reqwest::Error) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(cause) = source {
        let text = cause.to_string().to_lowercase();
        if text.contains("dns") || text.contains("resolve") || text.contains("lookup") {
            return true;
        }
        source = cause.source();
    }
    false
}

fn truncate_message(message: &str) -> String {
    if message.chars().count() <= MAX_MESSAGE_LEN {
        message.to_string()
    } else {
        let truncated: String = message.chars().take(MAX_MESSAGE_LEN).collect();
        format!("{}...", truncated)
    }
}
