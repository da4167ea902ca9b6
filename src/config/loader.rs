//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the upstream base URL.
pub const ENV_UPSTREAM_BASE_URL: &str = "UPSTREAM_BASE_URL";
/// Environment variable holding the upstream credential.
pub const ENV_UPSTREAM_API_KEY: &str = "UPSTREAM_API_KEY";
/// Environment variable holding the LLM API key.
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable overriding the listener address.
pub const ENV_BIND_ADDRESS: &str = "RELAY_BIND_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file and the process environment, then validate it.
pub fn load_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// Same as [`load_config`] with an explicit environment lookup.
pub fn load_config_with<F>(path: Option<&Path>, env: F) -> Result<RelayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => RelayConfig::default(),
    };

    apply_env_overrides(&mut config, env);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Environment values take precedence over the file. Empty values are ignored.
fn apply_env_overrides<F>(config: &mut RelayConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = lookup(ENV_UPSTREAM_BASE_URL) {
        config.upstream.base_url = url;
    }
    if let Some(key) = lookup(ENV_UPSTREAM_API_KEY) {
        config.upstream.api_key = Some(key);
    }
    if let Some(key) = lookup(ENV_OPENAI_API_KEY) {
        config.llm.api_key = Some(key);
    }
    if let Some(addr) = lookup(ENV_BIND_ADDRESS) {
        config.listener.bind_address = addr;
    }
}
