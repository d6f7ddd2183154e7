//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Operation against the upstream API:
//!     → retries.rs (run, classify failure, decide whether to retry)
//!     → backoff.rs (exponential delay with jitter between attempts)
//!     → timeouts.rs (optional external deadline around any suspension)
//! ```
//!
//! # Design Decisions
//! - Retry policy is immutable configuration; the handler holds no state
//! - Jittered backoff prevents synchronized retry storms
//! - The final error is returned as-is so callers can match on it
//! - Every wait is a Tokio timer, so dropping the future cancels it

pub mod backoff;
pub mod retries;
pub mod timeouts;

pub use retries::{RetryHandler, RetryPolicy};
