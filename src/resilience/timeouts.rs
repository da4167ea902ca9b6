//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap upstream calls with a deadline
//! - Cancel the wrapped operation cleanly on timeout
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - The deadline covers the whole exchange (send + body read)

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// The deadline elapsed before the operation completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("deadline of {0:?} elapsed")]
pub struct DeadlineElapsed(pub Duration);

/// Run `fut` to completion or drop it once `limit` has passed.
pub async fn with_deadline<F>(limit: Duration, fut: F) -> Result<F::Output, DeadlineElapsed>
where
    F: Future,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| DeadlineElapsed(limit))
}
