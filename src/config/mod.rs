//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (UPSTREAM_BASE_URL, UPSTREAM_API_KEY, ...)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → shared with handlers through AppState
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Missing upstream settings are fatal at startup, never per request

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::RelayConfig;
pub use schema::ListenerConfig;
pub use schema::UpstreamConfig;
pub use schema::LlmConfig;
pub use schema::ObservabilityConfig;
