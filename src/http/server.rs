//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, body limit, timeout, CORS)
//!
//! # Design Decisions
//! - The body limit is enforced by the JSON extractor so an oversized body
//!   is rejected through `ApiError` like any other failure
//! - Bind server to listener
//! - Hold the shared, immutable handler state

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::http::handlers;
use crate::http::request::{make_span, propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::shutdown::wait_for;
use crate::lifecycle::startup::{build_state, StartupError};
use crate::llm::CompletionService;
use crate::relay::UpstreamClient;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<UpstreamClient>,
    pub completion: Option<Arc<dyn CompletionService>>,
}

/// HTTP server for the relay.
pub struct HttpServer {
    config: RelayConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given (validated) configuration.
    pub fn new(config: RelayConfig) -> Result<Self, StartupError> {
        let state = build_state(&config)?;
        Ok(Self { config, state })
    }

    /// Replace the completion service built from config.
    pub fn with_completion_service(mut self, service: Arc<dyn CompletionService>) -> Self {
        self.state.completion = Some(service);
        self
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn router(&self) -> Router {
        let router = Router::new()
            .route("/relay", post(handlers::relay))
            .route("/generate", post(handlers::generate))
            .route("/greet", post(handlers::greet))
            .route("/health", get(handlers::health))
            .with_state(self.state.clone())
            .layer(DefaultBodyLimit::max(self.config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(self.config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(set_request_id_layer());

        if self.config.security.cors_allow_any {
            router.layer(CorsLayer::permissive())
        } else {
            router
        }
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream_timeout_secs = self.state.upstream.timeout().as_secs(),
            completion = self.state.completion.is_some(),
            "HTTP server starting"
        );

        let app = self.router();
        axum::serve(listener, app)
            .with_graceful_shutdown(wait_for(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}
