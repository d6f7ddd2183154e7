//! Timeout enforcement.
//!
//! # Responsibilities
//! - Put an external deadline around any suspension point (permit waits,
//!   retry loops, transport calls)
//! - Cancel the wrapped operation cleanly on timeout
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - Deadlines saturate to a far-future instant instead of overflowing

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

/// Roughly 30 years; used when `start + delay` is not representable.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// The deadline elapsed before the operation finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation timed out after {}ms", .0.as_millis())]
pub struct TimeoutError(pub Duration);

/// Run `future` with a deadline, dropping it if the deadline passes first.
pub async fn with_timeout<F>(limit: Duration, future: F) -> Result<F::Output, TimeoutError>
where
    F: Future,
{
    tokio::time::timeout(limit, future).await.map_err(|_| {
        tracing::warn!(timeout_ms = limit.as_millis() as u64, "Operation timed out");
        TimeoutError(limit)
    })
}

/// The instant `delay` after `start`, or a far-future instant on overflow.
pub fn deadline_after(start: Instant, delay: Duration) -> Instant {
    start
        .checked_add(delay)
        .or_else(|| start.checked_add(FAR_FUTURE))
        .unwrap_or(start)
}
