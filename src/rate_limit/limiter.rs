//! Token bucket rate limiter.
//!
//! # Responsibilities
//! - Admit at most `limit` operations per rolling window
//! - Refill continuously so permits come back between window boundaries
//! - Park callers (not threads) until their permits are available
//! - Report a [`RateLimitInfo`] snapshot without committing a refill
//!
//! # Design Decisions
//! - Bucket state sits behind one `std::sync::Mutex`; it is never held across
//!   an `.await`, so `info()` stays synchronous
//! - An async queue lock orders waiters: only its holder may consume, which
//!   keeps refill + consume atomic and first-come first-served
//! - Waiting is a single `sleep_until` on the window boundary; dropping the
//!   future releases the queue and leaves the bucket untouched

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::time::Instant;

use crate::observability::metrics;
use crate::rate_limit::types::{RateLimitError, RateLimitInfo};
use crate::resilience::timeouts::deadline_after;

#[derive(Debug, Clone, Copy)]
struct Bucket {
    tokens: u32,
    last_refill: Instant,
}

/// Token bucket limiter shared by every request of one client.
#[derive(Debug)]
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    bucket: Mutex<Bucket>,
    queue: tokio::sync::Mutex<()>,
}

impl RateLimiter {
    /// Create a full bucket of `limit` permits per `window`.
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            bucket: Mutex::new(Bucket {
                tokens: limit,
                last_refill: Instant::now(),
            }),
            queue: tokio::sync::Mutex::new(()),
        }
    }

    /// Maximum permits per window.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Length of the refill window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Wait until `tokens` permits are available, then consume them.
    ///
    /// Cancelling the returned future while it waits consumes nothing.
    /// Callers that need an upper bound on the wait should wrap this in
    /// [`with_timeout`](crate::resilience::timeouts::with_timeout).
    pub async fn acquire(&self, tokens: u32) -> Result<(), RateLimitError> {
        if tokens > self.limit {
            tracing::warn!(
                requested = tokens,
                limit = self.limit,
                "Rejecting permit request larger than the bucket"
            );
            return Err(RateLimitError::ExceedsCapacity {
                requested: tokens,
                limit: self.limit,
            });
        }
        if tokens == 0 {
            return Ok(());
        }

        let _turn = self.queue.lock().await;
        let started = Instant::now();
        let mut waited = false;

        loop {
            let deadline = {
                let mut bucket = self.lock_bucket();
                self.refill(&mut bucket, Instant::now());

                if bucket.tokens >= tokens {
                    bucket.tokens -= tokens;
                    if waited {
                        let wait = started.elapsed();
                        tracing::debug!(
                            requested = tokens,
                            remaining = bucket.tokens,
                            wait_ms = wait.as_millis() as u64,
                            "Rate limit permits acquired after waiting"
                        );
                        metrics::record_rate_limit_wait(wait);
                    }
                    return Ok(());
                }

                deadline_after(bucket.last_refill, self.window)
            };

            if !waited {
                tracing::info!(
                    requested = tokens,
                    limit = self.limit,
                    wait_ms = deadline.saturating_duration_since(Instant::now()).as_millis() as u64,
                    "Rate limit reached, waiting for refill"
                );
                waited = true;
            }
            tokio::time::sleep_until(deadline).await;
        }
    }

    /// Snapshot of the limiter as if it were refilled right now.
    pub fn info(&self) -> RateLimitInfo {
        let now = Instant::now();
        let mut preview = *self.lock_bucket();
        self.refill(&mut preview, now);

        let until_full =
            deadline_after(preview.last_refill, self.window).saturating_duration_since(now);
        let epoch_now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();

        RateLimitInfo::new(
            self.limit,
            preview.tokens,
            epoch_now + until_full.as_secs_f64(),
        )
    }

    fn refill(&self, bucket: &mut Bucket, now: Instant) {
        let elapsed = now.saturating_duration_since(bucket.last_refill);
        if elapsed >= self.window {
            bucket.tokens = self.limit;
            bucket.last_refill = now;
            return;
        }

        let earned = (elapsed.as_secs_f64() / self.window.as_secs_f64() * f64::from(self.limit))
            .floor() as u32;
        if earned > 0 {
            bucket.tokens = bucket.tokens.saturating_add(earned).min(self.limit);
            // Only advance by the time actually converted into tokens. Jumping
            // to `now` would drop the leftover fraction on every call, so
            // callers polling faster than one token's refill time would starve.
            let converted = Duration::try_from_secs_f64(
                self.window.as_secs_f64() * f64::from(earned) / f64::from(self.limit),
            )
            .unwrap_or(elapsed)
            .min(elapsed);
            bucket.last_refill += converted;
        }

        // A full bucket does not bank time.
        if bucket.tokens == self.limit {
            bucket.last_refill = now;
        }
    }

    fn lock_bucket(&self) -> MutexGuard<'_, Bucket> {
        self.bucket.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
