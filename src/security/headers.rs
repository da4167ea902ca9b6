//! Header manipulation for forwarded requests.
//!
//! # Responsibilities
//! - Convert caller-supplied header maps into validated HTTP headers
//! - Strip hop-by-hop and connection-level headers
//! - Inject the upstream credential header
//!
//! # Design Decisions
//! - The injected auth header always wins over a caller header of the same name
//! - Header values never appear in error messages
//! - The credential header value is marked sensitive

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::relay::error::{ClientBuildError, RelayError};

/// Headers that describe the inbound connection and are never forwarded.
pub const HOP_BY_HOP: &[&str] = &[
    "connection",
    "host",
    "content-length",
    "transfer-encoding",
    "keep-alive",
    "upgrade",
    "te",
    "trailer",
    "proxy-connection",
    "proxy-authorization",
];

/// Credential header injected into every upstream request.
#[derive(Debug, Clone)]
pub struct AuthHeader {
    name: HeaderName,
    value: HeaderValue,
}

impl AuthHeader {
    pub fn new(name: &str, value: &str) -> Result<Self, ClientBuildError> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ClientBuildError::AuthHeader(format!("'{}' is not a header name", name)))?;
        let mut value = HeaderValue::from_str(value).map_err(|_| {
            ClientBuildError::AuthHeader(format!("value for '{}' is not a valid header value", name))
        })?;
        value.set_sensitive(true);
        Ok(Self { name, value })
    }

    pub fn name(&self) -> &HeaderName {
        &self.name
    }
}

pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(&name.as_str())
}

/// Build the header map sent upstream from caller headers plus the injected credential.
pub fn forward_headers(
    caller: Option<&BTreeMap<String, String>>,
    auth: Option<&AuthHeader>,
) -> Result<HeaderMap, RelayError> {
    let mut headers = HeaderMap::new();

    for (name, value) in caller.into_iter().flatten() {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| RelayError::BadRequest(format!("invalid header name '{}'", name)))?;
        if is_hop_by_hop(&header_name) {
            tracing::debug!(header = %header_name, "Dropping hop-by-hop header");
            continue;
        }
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| RelayError::BadRequest(format!("invalid value for header '{}'", name)))?;
        headers.insert(header_name, header_value);
    }

    if let Some(auth) = auth {
        if headers.contains_key(&auth.name) {
            tracing::debug!(header = %auth.name, "Caller auth header replaced by configured credential");
        }
        headers.insert(auth.name.clone(), auth.value.clone());
    }

    Ok(headers)
}
