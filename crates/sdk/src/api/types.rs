use std::time::Duration;

use thiserror::Error;

/// Base configuration shared by every API handle.
#[derive(Debug, Clone)]
pub struct ClientBaseConfig {
    /// Root of the REST API, including any `/api` prefix.
    pub server_url: String,
    /// Per-request timeout; `None` keeps the stock 15 seconds.
    pub timeout: Option<Duration>,
}

/// Faults surfaced by the client.
///
/// `Clone` is deliberate: a single failed refresh exchange is fanned out to
/// every request parked behind it.
#[derive(Clone, Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status. The body is passed
    /// through verbatim; presentation is the caller's concern.
    #[error("api error: status {status}: {body}")]
    Status { status: u16, body: String },

    /// No response arrived: connection failure or request timeout. Never
    /// triggers the refresh path.
    #[error("network error: {message}")]
    Network { message: String },

    /// The response body did not match the expected shape.
    #[error("unexpected response shape: {0}")]
    Decode(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("request timed out: {err}")
        } else {
            err.to_string()
        };
        ApiError::Network { message }
    }

    /// HTTP status of the fault, when the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_network_fault(&self) -> bool {
        matches!(self, ApiError::Network { .. })
    }

    /// Human-readable `detail` field from a JSON error body, when present.
    /// Falls back to the raw body.
    pub fn detail(&self) -> Option<String> {
        let ApiError::Status { body, .. } = self else {
            return None;
        };
        let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
        match parsed.as_ref().and_then(|value| value.get("detail")).and_then(|d| d.as_str()) {
            Some(detail) => Some(detail.to_string()),
            None if body.is_empty() => None,
            None => Some(body.clone()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
