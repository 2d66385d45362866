use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the gateway client.
///
/// Each variant maps to one failure class a caller can act on: local
/// problems are never worth retrying, transport failures usually are, and
/// remote rejections carry whatever the gateway said about them.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Invalid gateway URL '{url}': {reason}")]
    InvalidConfig { url: String, reason: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to read {}: {source}", .path.display())]
    LocalIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Gateway responded with status {status}: {message}")]
    Remote {
        status: u16,
        message: String,
        traceback: Option<String>,
    },

    #[error("Unexpected response from {endpoint}: {reason}")]
    Protocol { endpoint: String, reason: String },
}

/// Coarse classification of a [`GatewayError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidConfig,
    InvalidInput,
    LocalIo,
    Transport,
    Remote,
    Protocol,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidConfig => "InvalidConfig",
            ErrorKind::InvalidInput => "InvalidInput",
            ErrorKind::LocalIo => "LocalIOError",
            ErrorKind::Transport => "TransportError",
            ErrorKind::Remote => "RemoteError",
            ErrorKind::Protocol => "ProtocolError",
        };
        f.write_str(name)
    }
}

impl GatewayError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn protocol(endpoint: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Protocol {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidConfig { .. } => ErrorKind::InvalidConfig,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::LocalIo { .. } => ErrorKind::LocalIo,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Remote { .. } => ErrorKind::Remote,
            Self::Protocol { .. } => ErrorKind::Protocol,
        }
    }

    /// HTTP status reported by the gateway, if the failure came from it.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Server-side message for remote rejections.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            Self::Remote { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn traceback(&self) -> Option<&str> {
        match self {
            Self::Remote { traceback, .. } => traceback.as_deref(),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// Whether retrying the same call later might succeed.
    ///
    /// Transport failures and 5xx answers are considered transient; a 4xx
    /// means the request itself was rejected.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Remote { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Builds a `Remote` error from a non-2xx response body.
    ///
    /// The gateway wraps failures as `{"detail": ...}` where `detail` is an
    /// object with `error`/`traceback`, a bare string, or a list of
    /// validation entries. Anything else falls back to the raw body text.
    pub(crate) fn from_error_body(status: u16, body: &str, reason: Option<&str>) -> Self {
        let fallback = || {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                reason.unwrap_or("request failed").to_string()
            } else {
                trimmed.to_string()
            }
        };

        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let (message, traceback) = match parsed.as_ref().and_then(|v| v.get("detail")) {
            Some(Value::String(text)) => (text.clone(), None),
            Some(Value::Object(detail)) => {
                let message = detail
                    .get("error")
                    .or_else(|| detail.get("message"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| Value::Object(detail.clone()).to_string());
                let traceback = detail
                    .get("traceback")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                (message, traceback)
            }
            Some(Value::Array(entries)) => {
                let messages: Vec<String> = entries
                    .iter()
                    .map(|entry| {
                        entry
                            .get("msg")
                            .and_then(Value::as_str)
                            .map(str::to_string)
                            .unwrap_or_else(|| entry.to_string())
                    })
                    .collect();
                (messages.join("; "), None)
            }
            Some(other) => (other.to_string(), None),
            None => match parsed.as_ref().and_then(unsuccessful_message) {
                Some(message) => (message, None),
                None => (fallback(), None),
            },
        };

        Self::Remote {
            status,
            message,
            traceback,
        }
    }
}

/// Message carried by a `{"success": false, ...}` body, if any.
pub(crate) fn unsuccessful_message(body: &Value) -> Option<String> {
    body.get("error")
        .or_else(|| body.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

pub type GatewayResult<T> = Result<T, GatewayError>;
