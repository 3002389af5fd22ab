use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by the fetch layer when loading dates or digests.
///
/// Each variant is one category of user-facing message; the fetch path is
/// not allowed to surface anything uncategorized.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Payload failed validation (malformed date, non-array date list).
    #[error("Invalid payload: {0}")]
    Validation(String),
    /// The bounded wait for the upstream was exceeded.
    #[error("Request timed out")]
    Timeout,
    /// Transport-level failure (DNS, connection, TLS).
    #[error("Network error: {0}")]
    Network(reqwest::Error),
    /// Non-success status from the digest API, with the upstream's text.
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },
    /// Catch-all for failures outside the categories above.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// JSON error body shared by the proxy's responses and the upstream API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Best-effort extraction of an error message from an upstream response body.
///
/// Prefers the API's `{error}` field, falls back to the raw body text, and
/// finally to a generic message naming the status.
pub fn upstream_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => format!("Digest service returned status {status}"),
    }
}
