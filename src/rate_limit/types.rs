//! Rate limit snapshot and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Point-in-time view of a rate limit, either computed locally by the
/// [`RateLimiter`](super::RateLimiter) or reported by the upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateLimitInfo {
    /// Maximum permits per window.
    pub limit: u32,
    /// Permits still available.
    pub remaining: u32,
    /// Epoch seconds at which the window is expected to be full again.
    pub reset: f64,
    /// Permits consumed (`limit - remaining`).
    pub used: u32,
}

impl RateLimitInfo {
    /// Build a snapshot, deriving `used` from `limit` and `remaining`.
    ///
    /// A `remaining` larger than `limit` reports zero usage.
    pub fn new(limit: u32, remaining: u32, reset: f64) -> Self {
        Self {
            limit,
            remaining,
            reset,
            used: limit.saturating_sub(remaining),
        }
    }

    /// True once no permits remain in the current window.
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

/// Errors returned by the rate limiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateLimitError {
    /// The request asks for more permits than the bucket can ever hold.
    #[error("requested {requested} permits but the limit is {limit} per window")]
    ExceedsCapacity { requested: u32, limit: u32 },
}
