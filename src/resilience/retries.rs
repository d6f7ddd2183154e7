//! Retry logic.
//!
//! # States
//! - Attempting: the operation is running
//! - Waiting: a failed attempt is followed by a backoff delay
//! - Succeeded: the operation returned `Ok` (terminal)
//! - Exhausted: the last allowed attempt failed (terminal)
//!
//! # State Transitions
//! ```text
//! Attempting → Succeeded: operation returns Ok
//! Attempting → Waiting: operation fails and attempts remain
//! Waiting → Attempting: backoff delay elapsed
//! Attempting → Exhausted: operation fails, no attempts remain (error returned as-is)
//! ```
//!
//! # Design Decisions
//! - At most `max_retries + 1` attempts in total
//! - The last error is returned unwrapped so callers can match on it
//! - `retry_if` lets the caller stop early on failures that will not heal

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use crate::config::RetryConfig;
use crate::observability::metrics;
use crate::resilience::backoff::calculate_backoff;

/// Immutable retry configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Upper bound on any single delay (before jitter).
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }
}

/// Re-runs fallible async operations according to a [`RetryPolicy`].
#[derive(Debug, Clone, Default)]
pub struct RetryHandler {
    policy: RetryPolicy,
}

impl RetryHandler {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `operation`, retrying every failure until the policy is exhausted.
    pub async fn retry<F, Fut, T, E>(&self, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.retry_if(operation, |_| true).await
    }

    /// Run `operation`, retrying only failures for which `should_retry` is true.
    pub async fn retry_if<F, Fut, T, E, P>(
        &self,
        mut operation: F,
        mut should_retry: P,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
        P: FnMut(&E) -> bool,
    {
        let mut attempt: u32 = 0;

        loop {
            let err = match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        tracing::info!(
                            attempts = attempt + 1,
                            "Operation succeeded after retrying"
                        );
                    }
                    return Ok(value);
                }
                Err(err) => err,
            };

            if !should_retry(&err) {
                tracing::debug!(attempt = attempt + 1, error = %err, "Failure is not retryable");
                return Err(err);
            }

            if attempt >= self.policy.max_retries {
                tracing::warn!(attempts = attempt + 1, error = %err, "Retries exhausted");
                metrics::record_retries_exhausted();
                return Err(err);
            }

            let delay = calculate_backoff(attempt, self.policy.base_delay, self.policy.max_delay);
            tracing::info!(
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Retrying operation"
            );
            metrics::record_retry();
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
