//! Relay request types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::relay::error::RelayError;

/// HTTP method the caller wants issued upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RelayMethod {
    #[default]
    #[serde(alias = "get")]
    Get,
    #[serde(alias = "post")]
    Post,
    #[serde(alias = "put")]
    Put,
    #[serde(alias = "patch")]
    Patch,
    #[serde(alias = "delete")]
    Delete,
}

impl RelayMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelayMethod::Get => "GET",
            RelayMethod::Post => "POST",
            RelayMethod::Put => "PUT",
            RelayMethod::Patch => "PATCH",
            RelayMethod::Delete => "DELETE",
        }
    }

    /// Whether a caller payload is sent as the request body. GET never carries one.
    pub fn carries_body(&self) -> bool {
        !matches!(self, RelayMethod::Get)
    }
}

impl From<RelayMethod> for reqwest::Method {
    fn from(method: RelayMethod) -> Self {
        match method {
            RelayMethod::Get => reqwest::Method::GET,
            RelayMethod::Post => reqwest::Method::POST,
            RelayMethod::Put => reqwest::Method::PUT,
            RelayMethod::Patch => reqwest::Method::PATCH,
            RelayMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

impl std::fmt::Display for RelayMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A caller's instruction to forward one request upstream.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RelayRequest {
    /// Upstream path appended to the base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub method: RelayMethod,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,

    /// Query-string parameters.
    #[serde(default, alias = "params", skip_serializing_if = "Option::is_none")]
    pub query: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
}

impl RelayRequest {
    pub fn new(method: RelayMethod, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            method,
            ..Default::default()
        }
    }

    /// The endpoint, rejecting missing or blank values.
    pub fn endpoint(&self) -> Result<&str, RelayError> {
        match self.endpoint.as_deref() {
            Some(endpoint) if !endpoint.trim().is_empty() => Ok(endpoint),
            _ => Err(RelayError::BadRequest("endpoint is required".to_string())),
        }
    }
}
