//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems from a validated configuration
//! - Build the shared handler state exactly once
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently

use std::sync::Arc;

use thiserror::Error;

use crate::config::RelayConfig;
use crate::http::server::AppState;
use crate::llm::{create_completion_service, LlmError};
use crate::relay::{ClientBuildError, UpstreamClient};

/// Fatal errors raised before the listener starts.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("upstream client: {0}")]
    Upstream(#[from] ClientBuildError),

    #[error("completion service: {0}")]
    Completion(#[from] LlmError),
}

/// Build handler state: the upstream client first, then the optional completion service.
pub fn build_state(config: &RelayConfig) -> Result<AppState, StartupError> {
    let upstream = UpstreamClient::new(&config.upstream)?;
    let completion = create_completion_service(&config.llm)?;

    Ok(AppState {
        upstream: Arc::new(upstream),
        completion,
    })
}
