//! Endpoint handlers.

use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::request::request_id;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::llm::prompts::{greeting_prompt, DEFAULT_GREETING_NAME, DEFAULT_TASK_PROMPT};
use crate::llm::CompletionService;
use crate::observability::metrics;
use crate::relay::RelayRequest;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub response: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct GreetRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GreetResponse {
    pub greeting: String,
}

pub async fn health() -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "ok",
    })
}

/// `POST /relay`: forward the described request upstream.
pub async fn relay(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<RelayRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let start = Instant::now();
    let request_id = request_id(&headers);

    let Json(request) = body.map_err(|rejection| {
        tracing::warn!(request_id = %request_id, error = %rejection, "Rejected relay body");
        let err = ApiError::from(rejection);
        metrics::record_relay("unknown", err.kind(), err.status_code().as_u16(), start);
        err
    })?;

    let method = request.method.as_str();
    match state.upstream.relay(&request).await {
        Ok(value) => {
            metrics::record_relay(method, "success", 200, start);
            Ok(Json(value))
        }
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                method = method,
                endpoint = request.endpoint.as_deref().unwrap_or(""),
                kind = e.kind(),
                status = e.status_code().as_u16(),
                "Relay failed"
            );
            metrics::record_relay(method, e.kind(), e.status_code().as_u16(), start);
            Err(e.into())
        }
    }
}

/// `POST /generate`: run a prompt through the completion service.
pub async fn generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(request) = body?;

    let prompt = match request.prompt {
        Some(prompt) if prompt.trim().is_empty() => {
            return Err(ApiError::BadRequest("prompt must not be empty".to_string()));
        }
        Some(prompt) => prompt,
        None => DEFAULT_TASK_PROMPT.to_string(),
    };

    let service = completion_service(&state)?;
    let response = run_completion(service, "generate", &prompt, request_id(&headers)).await?;
    Ok(Json(GenerateResponse { response }))
}

/// `POST /greet`: produce a festive greeting for `name`.
pub async fn greet(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<GreetRequest>, JsonRejection>,
) -> Result<Json<GreetResponse>, ApiError> {
    let Json(request) = body?;

    let name = request
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_GREETING_NAME.to_string());

    let service = completion_service(&state)?;
    let greeting = run_completion(service, "greet", &greeting_prompt(&name), request_id(&headers)).await?;
    Ok(Json(GreetResponse { greeting }))
}

fn completion_service(state: &AppState) -> Result<&dyn CompletionService, ApiError> {
    state
        .completion
        .as_deref()
        .ok_or(ApiError::ServiceUnavailable("generation service disabled"))
}

async fn run_completion(
    service: &dyn CompletionService,
    endpoint: &'static str,
    prompt: &str,
    request_id: &str,
) -> Result<String, ApiError> {
    match service.complete(prompt).await {
        Ok(text) => {
            metrics::record_completion(endpoint, "success");
            Ok(text)
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, endpoint = endpoint, error = %e, "Completion failed");
            metrics::record_completion(endpoint, "generation_failed");
            Err(ApiError::GenerationFailed(e))
        }
    }
}
