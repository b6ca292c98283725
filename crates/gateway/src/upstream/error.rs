//! Upstream API errors.

use thiserror::Error;

/// Errors that can occur when calling the upstream API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Request could not be built (bad credential header or URL).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl UpstreamError {
    /// Upstream HTTP status, if the call got that far.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
