//! Completion service trait

use std::sync::Arc;

use async_trait::async_trait;

use super::error::LlmError;
use super::openai::OpenAiClient;
use crate::config::LlmConfig;

/// Prompt in, text out.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Generate text for a single user prompt.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Create the configured completion service, or `None` when the LLM is disabled.
pub fn create_completion_service(
    config: &LlmConfig,
) -> Result<Option<Arc<dyn CompletionService>>, LlmError> {
    if !config.enabled {
        tracing::info!("Completion service disabled");
        return Ok(None);
    }

    let client = OpenAiClient::new(config)?;
    tracing::info!(model = %config.model, base_url = %config.base_url, "Completion service initialized");
    Ok(Some(Arc::new(client)))
}
