//! Request identification.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) unless the caller sent one
//! - Echo the ID on the response
//! - Attach the ID to the per-request trace span
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The ID is never forwarded upstream; only caller-listed headers are

use axum::{
    body::Body,
    http::{HeaderMap, Request},
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tracing::Span;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Sets `x-request-id` on incoming requests that lack one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

/// Copies `x-request-id` from the request onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

/// The request ID, or `"unknown"` when absent or not UTF-8.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Span factory for `TraceLayer`.
pub fn make_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id(request.headers()),
    )
}
