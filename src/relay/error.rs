//! Relay error taxonomy.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Why the upstream could not be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCause {
    /// No complete response within the upstream deadline.
    Timeout,
    /// DNS failure, connection refused, TLS handshake failure.
    Connect,
    /// Connection dropped mid-exchange or any other transport fault.
    Other,
}

impl TransportCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportCause::Timeout => "timeout",
            TransportCause::Connect => "connect",
            TransportCause::Other => "other",
        }
    }

    /// Classify a transport error. Connect failures win over timeouts so a
    /// connect timeout reports as a connect failure.
    pub fn classify(err: &reqwest::Error) -> Self {
        if err.is_connect() {
            TransportCause::Connect
        } else if err.is_timeout() {
            TransportCause::Timeout
        } else {
            TransportCause::Other
        }
    }
}

/// Errors produced while relaying one request.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Caller input invalid; nothing was sent upstream.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Upstream answered with a non-2xx status.
    #[error("upstream returned status {status}")]
    Upstream { status: StatusCode, detail: Value },

    /// Upstream could not be reached or did not answer in time.
    #[error("upstream unreachable ({}): {detail}", .cause.as_str())]
    UpstreamUnreachable { cause: TransportCause, detail: String },

    /// Upstream answered 2xx with a body that is not JSON.
    #[error("upstream returned an invalid response: {0}")]
    UpstreamInvalidResponse(String),
}

impl RelayError {
    pub fn timeout(limit: Duration) -> Self {
        RelayError::UpstreamUnreachable {
            cause: TransportCause::Timeout,
            detail: format!("upstream did not respond within {}s", limit.as_secs_f64()),
        }
    }

    /// Build a transport error from a reqwest failure. The message is fixed
    /// per cause; the underlying error text is not carried.
    pub fn transport(err: &reqwest::Error, limit: Duration) -> Self {
        match TransportCause::classify(err) {
            TransportCause::Timeout => Self::timeout(limit),
            TransportCause::Connect => RelayError::UpstreamUnreachable {
                cause: TransportCause::Connect,
                detail: "could not connect to upstream".to_string(),
            },
            TransportCause::Other => RelayError::UpstreamUnreachable {
                cause: TransportCause::Other,
                detail: "upstream request failed".to_string(),
            },
        }
    }

    /// Machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::BadRequest(_) => "bad_request",
            RelayError::Upstream { .. } => "upstream_error",
            RelayError::UpstreamUnreachable { .. } => "upstream_unreachable",
            RelayError::UpstreamInvalidResponse(_) => "upstream_invalid_response",
        }
    }

    /// Status code returned to the caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::Upstream { status, .. } => *status,
            RelayError::UpstreamUnreachable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::UpstreamInvalidResponse(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Value placed in the `detail` field of the error body.
    pub fn detail(&self) -> Value {
        match self {
            RelayError::BadRequest(msg) => Value::String(msg.clone()),
            RelayError::Upstream { detail, .. } => detail.clone(),
            RelayError::UpstreamUnreachable { detail, .. } => Value::String(detail.clone()),
            RelayError::UpstreamInvalidResponse(msg) => Value::String(msg.clone()),
        }
    }
}

/// Errors building the upstream client at startup.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid upstream base URL: {0}")]
    BaseUrl(#[from] url::ParseError),

    #[error("invalid auth header: {0}")]
    AuthHeader(String),
}
