//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that required upstream settings and credentials are present
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderName;
use thiserror::Error;

use crate::config::schema::RelayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("upstream.base_url is not set (UPSTREAM_BASE_URL)")]
    MissingUpstreamUrl,

    #[error("upstream.base_url '{0}' is not an http(s) URL")]
    InvalidUpstreamUrl(String),

    #[error("upstream credential is required but not set (UPSTREAM_API_KEY)")]
    MissingUpstreamCredential,

    #[error("upstream.auth_header '{0}' is not a valid header name")]
    InvalidAuthHeader(String),

    #[error("llm is enabled but no API key is set (OPENAI_API_KEY)")]
    MissingLlmCredential,

    #[error("{field} must be greater than zero")]
    ZeroValue { field: &'static str },

    #[error("timeouts.request_secs ({request}) must exceed {field} ({limit})")]
    InboundTimeoutTooShort {
        field: &'static str,
        request: u64,
        limit: u64,
    },

    #[error("{field} '{value}' is not a socket address")]
    InvalidAddress { field: &'static str, value: String },
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    let upstream = &config.upstream;
    if upstream.base_url.trim().is_empty() {
        errors.push(ValidationError::MissingUpstreamUrl);
    } else {
        match url::Url::parse(&upstream.base_url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            _ => errors.push(ValidationError::InvalidUpstreamUrl(upstream.base_url.clone())),
        }
    }

    if upstream.require_credential && upstream.auth_value().is_none() {
        errors.push(ValidationError::MissingUpstreamCredential);
    }

    if HeaderName::from_bytes(upstream.auth_header.as_bytes()).is_err() {
        errors.push(ValidationError::InvalidAuthHeader(upstream.auth_header.clone()));
    }

    if upstream.timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue { field: "upstream.timeout_secs" });
    }
    if upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue { field: "upstream.connect_timeout_secs" });
    }
    if config.timeouts.request_secs <= upstream.timeout_secs {
        errors.push(ValidationError::InboundTimeoutTooShort {
            field: "upstream.timeout_secs",
            request: config.timeouts.request_secs,
            limit: upstream.timeout_secs,
        });
    }
    if upstream.max_response_size == 0 {
        errors.push(ValidationError::ZeroValue { field: "upstream.max_response_size" });
    }

    if config.llm.enabled {
        if config.llm.api_key.as_deref().map_or(true, str::is_empty) {
            errors.push(ValidationError::MissingLlmCredential);
        }
        if config.llm.timeout_secs == 0 {
            errors.push(ValidationError::ZeroValue { field: "llm.timeout_secs" });
        }
        if config.timeouts.request_secs <= config.llm.timeout_secs {
            errors.push(ValidationError::InboundTimeoutTooShort {
                field: "llm.timeout_secs",
                request: config.timeouts.request_secs,
                limit: config.llm.timeout_secs,
            });
        }
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroValue { field: "security.max_body_size" });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
