//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the relay service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream REST API the relay forwards to.
    pub upstream: UpstreamConfig,

    /// LLM completion service.
    pub llm: LlmConfig,

    /// Inbound timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream REST API configuration.
///
/// `base_url` and `api_key` are usually supplied through the environment
/// (`UPSTREAM_BASE_URL`, `UPSTREAM_API_KEY`) rather than the config file.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL the caller's endpoint is appended to (e.g., "https://api.wotnot.io").
    pub base_url: String,

    /// Credential injected into every upstream request.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Refuse to start without a credential.
    pub require_credential: bool,

    /// Header carrying the credential.
    pub auth_header: String,

    /// Scheme prefixed to the credential ("Bearer"). Empty sends the bare key.
    pub auth_scheme: String,

    /// Total time for one upstream exchange (send + body read) in seconds.
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Idle pooled connections kept per upstream host.
    pub pool_max_idle_per_host: usize,

    /// Largest upstream response body read, in bytes.
    pub max_response_size: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: None,
            require_credential: true,
            auth_header: "Authorization".to_string(),
            auth_scheme: "Bearer".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 5,
            pool_max_idle_per_host: 32,
            max_response_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

impl UpstreamConfig {
    /// Value of the injected auth header, if a credential is configured.
    pub fn auth_value(&self) -> Option<String> {
        let key = self.api_key.as_deref().filter(|k| !k.is_empty())?;
        if self.auth_scheme.is_empty() {
            Some(key.to_string())
        } else {
            Some(format!("{} {}", self.auth_scheme, key))
        }
    }
}

/// LLM completion service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Enable the completion endpoints.
    pub enabled: bool,

    /// OpenAI-compatible API root (without `/chat/completions`).
    pub base_url: String,

    /// Model name sent with every request.
    pub model: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// API key (`OPENAI_API_KEY`).
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Completion request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            api_key: None,
            timeout_secs: 30,
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    /// Must exceed the upstream timeout so upstream failures are reported, not cut off.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 60 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
    /// Allow cross-origin requests from any origin.
    pub cors_allow_any: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
            cors_allow_any: true,
        }
    }
}
