//! Metrics collection.
//!
//! # Metrics
//! - `client_cache_hits_total` / `client_cache_misses_total` (counter)
//! - `client_cache_evictions_total` (counter)
//! - `client_cache_entries` (gauge)
//! - `client_rate_limit_waits_total` (counter), `client_rate_limit_wait_seconds` (histogram)
//! - `client_retries_total` (counter), `client_retries_exhausted_total` (counter)
//! - `client_upstream_responses_total` (counter, by status)
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; the crate installs no exporter
//! - Labels are limited to the status code to keep cardinality bounded

use std::time::Duration;

use metrics::{counter, gauge, histogram};

pub fn record_cache_hit() {
    counter!("client_cache_hits_total").increment(1);
}

pub fn record_cache_miss() {
    counter!("client_cache_misses_total").increment(1);
}

pub fn record_cache_eviction() {
    counter!("client_cache_evictions_total").increment(1);
}

pub fn record_cache_size(entries: usize) {
    gauge!("client_cache_entries").set(entries as f64);
}

/// Record a caller that had to wait for rate limit permits.
pub fn record_rate_limit_wait(wait: Duration) {
    counter!("client_rate_limit_waits_total").increment(1);
    histogram!("client_rate_limit_wait_seconds").record(wait.as_secs_f64());
}

pub fn record_retry() {
    counter!("client_retries_total").increment(1);
}

pub fn record_retries_exhausted() {
    counter!("client_retries_exhausted_total").increment(1);
}

/// Record one upstream response by status code.
pub fn record_response(status: u16) {
    counter!("client_upstream_responses_total", "status" => status.to_string()).increment(1);
}
