//! Error types for the completion layer

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when calling the completion service
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP request failures
    #[error("HTTP error (status {status}): {body}")]
    HttpError { status: u16, body: String },

    /// No response within the configured timeout
    #[error("Completion timed out after {0:?}")]
    Timeout(Duration),

    /// JSON encoding/decoding issues
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Provider answered without any generated text
    #[error("Completion contained no text")]
    EmptyCompletion,

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::HttpError {
            status: err.status().map_or(0, |s| s.as_u16()),
            body: err.to_string(),
        }
    }
}
