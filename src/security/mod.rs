//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Caller-supplied headers (RelayRequest.headers)
//!     → headers.rs (validate, strip hop-by-hop, inject credential)
//!     → upstream request
//! ```
//!
//! # Design Decisions
//! - The upstream credential lives only in the client and the outbound request
//! - Inbound body size is capped at the router (tower-http limit layer)

pub mod headers;
