//! Upstream REST client.
//!
//! # Responsibilities
//! - Build the upstream URL from the base URL and the caller's endpoint
//! - Dispatch one request with caller headers, query and payload
//! - Translate the upstream response (or its absence) into a JSON value or a [`RelayError`]

use std::time::{Duration, Instant};

use reqwest::{redirect, Client, Response, StatusCode, Url};
use serde_json::Value;

use crate::config::UpstreamConfig;
use crate::relay::error::{ClientBuildError, RelayError};
use crate::relay::types::RelayRequest;
use crate::resilience::timeouts::with_deadline;
use crate::security::headers::{forward_headers, AuthHeader};

/// Pooled client for the configured upstream. Built once at startup.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: Client,
    base_url: String,
    origin: url::Origin,
    auth: Option<AuthHeader>,
    timeout: Duration,
    max_response_size: usize,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, ClientBuildError> {
        let origin = Url::parse(&config.base_url)?.origin();

        // Redirects are relayed, not followed: a Location on another host
        // would receive the injected credential.
        let http = Client::builder()
            .redirect(redirect::Policy::none())
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build()?;

        let auth = config
            .auth_value()
            .map(|value| AuthHeader::new(&config.auth_header, &value))
            .transpose()?;

        tracing::info!(
            base_url = %config.base_url,
            timeout_secs = config.timeout_secs,
            credential = auth.is_some(),
            "Upstream client initialized"
        );

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            origin,
            auth,
            timeout: Duration::from_secs(config.timeout_secs),
            max_response_size: config.max_response_size,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Concatenate base URL and endpoint verbatim. The result must stay on the
    /// upstream origin so the credential is never sent elsewhere.
    pub fn build_url(&self, endpoint: &str) -> Result<Url, RelayError> {
        let url = Url::parse(&format!("{}{}", self.base_url, endpoint)).map_err(|_| {
            RelayError::BadRequest(format!("endpoint '{}' does not form a valid URL", endpoint))
        })?;

        if url.origin() != self.origin {
            return Err(RelayError::BadRequest(format!(
                "endpoint '{}' leaves the upstream host",
                endpoint
            )));
        }

        Ok(url)
    }

    /// Forward one request upstream. Single attempt, bounded by the upstream timeout.
    pub async fn relay(&self, request: &RelayRequest) -> Result<Value, RelayError> {
        let endpoint = request.endpoint()?;
        let url = self.build_url(endpoint)?;
        let headers = forward_headers(request.headers.as_ref(), self.auth.as_ref())?;

        let mut builder = self
            .http
            .request(request.method.into(), url)
            .headers(headers);
        if let Some(query) = &request.query {
            builder = builder.query(query);
        }
        if request.method.carries_body() {
            if let Some(payload) = &request.payload {
                builder = builder.json(payload);
            }
        }

        tracing::debug!(method = %request.method, endpoint = %endpoint, "Dispatching upstream request");
        let start = Instant::now();

        let exchange = async {
            let response = builder.send().await?;
            let status = response.status();
            let body = read_capped(response, self.max_response_size).await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        let (status, body) = match with_deadline(self.timeout, exchange).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                tracing::error!(
                    method = %request.method,
                    endpoint = %endpoint,
                    error = %e,
                    "Upstream transport error"
                );
                return Err(RelayError::transport(&e, self.timeout));
            }
            Err(elapsed) => {
                tracing::error!(
                    method = %request.method,
                    endpoint = %endpoint,
                    deadline = ?elapsed.0,
                    "Upstream timed out"
                );
                return Err(RelayError::timeout(self.timeout));
            }
        };

        let Some(body) = body else {
            tracing::error!(
                method = %request.method,
                endpoint = %endpoint,
                status = %status,
                limit = self.max_response_size,
                "Upstream response too large"
            );
            return Err(RelayError::UpstreamInvalidResponse(format!(
                "upstream response exceeds {} bytes",
                self.max_response_size
            )));
        };

        tracing::debug!(
            method = %request.method,
            endpoint = %endpoint,
            status = %status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Upstream responded"
        );

        interpret_response(status, &body)
    }
}

/// Read the response body, giving up with `None` once it exceeds `limit` bytes.
async fn read_capped(mut response: Response, limit: usize) -> Result<Option<Vec<u8>>, reqwest::Error> {
    if response.content_length().is_some_and(|len| len > limit as u64) {
        return Ok(None);
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if body.len() + chunk.len() > limit {
            return Ok(None);
        }
        body.extend_from_slice(&chunk);
    }
    Ok(Some(body))
}

/// Map an upstream status and raw body to the relay result.
pub fn interpret_response(status: StatusCode, body: &[u8]) -> Result<Value, RelayError> {
    if status.is_success() {
        if is_blank(body) {
            return Ok(Value::Null);
        }
        return serde_json::from_slice(body).map_err(|_| {
            RelayError::UpstreamInvalidResponse(format!(
                "upstream returned a non-JSON body with status {}",
                status.as_u16()
            ))
        });
    }

    let detail = if is_blank(body) {
        Value::String(status.canonical_reason().unwrap_or_default().to_string())
    } else {
        serde_json::from_slice(body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
    };

    tracing::warn!(status = %status, "Upstream reported an error");
    Err(RelayError::Upstream { status, detail })
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}
