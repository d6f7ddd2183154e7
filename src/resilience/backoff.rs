//! Exponential backoff with jitter.

use std::time::Duration;
use rand::Rng;

/// Delay to wait after the failed attempt number `attempt` (zero-based).
///
/// `min(max, base * 2^attempt)` plus up to 10% random jitter.
pub fn calculate_backoff(attempt: u32, base: Duration, max: Duration) -> Duration {
    let factor = 2u32.saturating_pow(attempt);
    let capped_delay = base.saturating_mul(factor).min(max);

    // Apply jitter (0 to 10% of the delay)
    let jitter_range = (capped_delay.as_nanos() / 10) as u64;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    capped_delay + Duration::from_nanos(jitter)
}
