//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream or completion service:
//!     → timeouts.rs (enforce deadline on the whole exchange)
//!     → on expiry: caller gets a timeout error, the in-flight call is dropped
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No retries: each relay call is a single attempt

pub mod timeouts;
