//! Rate limiting subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound request (cache miss):
//!     → limiter.rs (refill bucket, wait for permits, consume)
//!     → Request proceeds to the retry handler
//!
//! Response headers:
//!     → http::response::parse_rate_limit
//!     → RateLimitInfo (types.rs) reported back to the caller
//! ```
//!
//! # Design Decisions
//! - One bucket per client, no per-key buckets
//! - Integer tokens refilled continuously over the window
//! - Waiters queue in arrival order; a waiter never spins
//! - Requests larger than the bucket are rejected, not parked forever

pub mod limiter;
pub mod types;

pub use limiter::RateLimiter;
pub use types::{RateLimitError, RateLimitInfo};
