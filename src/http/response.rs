//! Error responses.
//!
//! # Responsibilities
//! - Map relay and completion failures to HTTP status codes
//! - Render every failure as `{ detail, error_kind, status_code }`
//!
//! # Design Decisions
//! - Handlers return `Result<_, ApiError>`; nothing escapes as a bare 500
//! - Collaborator error text is logged, not returned

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::llm::LlmError;
use crate::relay::RelayError;

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: Value,
    pub error_kind: &'static str,
    pub status_code: u16,
}

/// Errors surfaced by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("generation failed: {0}")]
    GenerationFailed(#[from] LlmError),

    #[error("{0}")]
    ServiceUnavailable(&'static str),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Relay(e) => e.status_code(),
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::GenerationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Relay(e) => e.kind(),
            ApiError::BadRequest(_) => "bad_request",
            ApiError::PayloadTooLarge(_) => "payload_too_large",
            ApiError::GenerationFailed(_) => "generation_failed",
            ApiError::ServiceUnavailable(_) => "service_unavailable",
        }
    }

    fn detail(&self) -> Value {
        match self {
            ApiError::Relay(e) => e.detail(),
            ApiError::BadRequest(msg) | ApiError::PayloadTooLarge(msg) => Value::String(msg.clone()),
            ApiError::GenerationFailed(_) => Value::String("generation failed".to_string()),
            ApiError::ServiceUnavailable(msg) => Value::String((*msg).to_string()),
        }
    }
}

/// A body the extractor refused. Oversized bodies keep their 413; everything
/// else is the caller's malformed input.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(rejection.body_text())
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            detail: self.detail(),
            error_kind: self.kind(),
            status_code: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}
