//! Client error types
//!
//! Every failure a backend call can produce, from transport problems to
//! malformed bodies.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the WatchML backend
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure (connection refused, timeout, reset)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response after the retry budget was spent
    #[error("HTTP error {status}: {status_text}")]
    Http { status: u16, status_text: String },

    /// Response body was not the JSON we expected
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Image payload was not valid base64
    #[error("Decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    /// Reading a local file for upload failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Build an HTTP error from a response status, using its reason phrase
    /// as the status text.
    pub fn http(status: StatusCode) -> Self {
        ClientError::Http {
            status: status.as_u16(),
            status_text: status
                .canonical_reason()
                .unwrap_or("Unknown Status")
                .to_string(),
        }
    }

    /// True for non-2xx responses
    pub fn is_http(&self) -> bool {
        matches!(self, ClientError::Http { .. })
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
