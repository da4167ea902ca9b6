//! Upstream relay subsystem.
//!
//! # Data Flow
//! ```text
//! RelayRequest (JSON body of POST /relay)
//!     → types.rs (validate endpoint, method, payload policy)
//!     → client.rs (base URL + endpoint, headers, query, deadline)
//!     → upstream REST API
//!     → client.rs (2xx JSON passthrough, error translation)
//!     → RelayError (error.rs) or JSON value
//! ```
//!
//! # Design Decisions
//! - Single attempt per request, no retries
//! - One pooled client per process, injected through handler state
//! - Transport failures carry a fixed description, never the raw error

pub mod client;
pub mod error;
pub mod types;

pub use client::UpstreamClient;
pub use error::{ClientBuildError, RelayError, TransportCause};
pub use types::{RelayMethod, RelayRequest};
