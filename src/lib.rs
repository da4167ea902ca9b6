//! Upstream API relay library

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod llm;
pub mod observability;
pub mod relay;
pub mod resilience;
pub mod security;

pub use config::schema::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use relay::{RelayError, RelayMethod, RelayRequest};
