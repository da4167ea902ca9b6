//! OpenAI-compatible chat completions client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::error::LlmError;
use super::provider::CompletionService;
use crate::config::LlmConfig;
use crate::resilience::timeouts::with_deadline;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for `POST {base_url}/chat/completions`
pub struct OpenAiClient {
    http_client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    timeout: Duration,
}

impl OpenAiClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is configured or the HTTP client cannot be built.
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| LlmError::InvalidRequest("missing API key".to_string()))?;

        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| LlmError::HttpError {
                status: 0,
                body: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: vec![ChatMessage { role: "user", content: prompt }],
        };

        let exchange = async {
            let response = self
                .http_client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        let (status, body) = with_deadline(self.timeout, exchange)
            .await
            .map_err(|_| LlmError::Timeout(self.timeout))??;

        if !status.is_success() {
            return Err(LlmError::HttpError {
                status: status.as_u16(),
                body,
            });
        }

        parse_completion(&body)
    }
}

/// Extract the first choice's text from a chat completions body.
fn parse_completion(body: &str) -> Result<String, LlmError> {
    let response: ChatResponse = serde_json::from_str(body)?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or(LlmError::EmptyCompletion)
}
