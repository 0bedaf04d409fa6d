use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Categories of gateway errors for consistent error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    /// Network/transport failure (timeout, connection refused, ...)
    Transport,
    /// HTTP error status (4xx, 5xx)
    HttpStatus,
    /// Failed to parse a response body or SSE frame
    Parse,
    /// Error event delivered mid-stream by the backend
    Api,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Transport => write!(f, "transport"),
            ApiErrorKind::HttpStatus => write!(f, "http_status"),
            ApiErrorKind::Parse => write!(f, "parse"),
            ApiErrorKind::Api => write!(f, "api"),
        }
    }
}

/// Structured error from the Request Gateway.
///
/// Carries a display message, the HTTP status when one was received, and the
/// machine-readable error code when the backend supplied one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error category
    pub kind: ApiErrorKind,
    /// One-line summary suitable for display
    pub message: String,
    /// HTTP status, when the failure happened after a response arrived
    pub status: Option<u16>,
    /// Machine-readable error code from the backend, if any
    pub code: Option<String>,
}

impl ApiError {
    /// Creates a new gateway error.
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            code: None,
        }
    }

    /// Creates an HTTP status error from a response body.
    ///
    /// Attempts to extract `{"error": {"message", "code"}}` (or the flat
    /// `{"message", "code"}` shape) from a JSON body; falls back to a
    /// generic `HTTP <status>` message when the body is empty or
    /// unparseable. The status is always carried.
    pub fn http_status(status: u16, body: &str) -> Self {
        let mut message = format!("HTTP {status}");
        let mut code = None;

        if let Ok(json) = serde_json::from_str::<Value>(body) {
            let obj = json.get("error").unwrap_or(&json);
            if let Some(msg) = obj.get("message").and_then(|v| v.as_str()) {
                message = format!("HTTP {status}: {msg}");
            }
            code = obj
                .get("code")
                .and_then(|v| v.as_str())
                .map(ToString::to_string);
        }

        Self {
            kind: ApiErrorKind::HttpStatus,
            message,
            status: Some(status),
            code,
        }
    }

    /// Classifies a reqwest error into a transport error.
    pub fn transport(e: &reqwest::Error) -> Self {
        let message = if e.is_timeout() {
            format!("Request timed out: {e}")
        } else if e.is_connect() {
            format!("Connection failed: {e}")
        } else if e.is_request() {
            format!("Request error: {e}")
        } else {
            format!("Network error: {e}")
        };
        Self::new(ApiErrorKind::Transport, message)
    }

    /// Creates a parse error (response body or SSE frame).
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Parse, message)
    }

    /// Creates an API error from a mid-stream error event.
    pub fn api(code: Option<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Api,
            message: message.into(),
            status: None,
            code,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
