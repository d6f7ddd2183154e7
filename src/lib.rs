//! Client-side resilience layer for rate-limited HTTP APIs.
//!
//! Combines a token bucket rate limiter, a TTL response cache, retries with
//! exponential backoff and a response classifier behind [`ResilientClient`].

pub mod cache;
pub mod config;
pub mod http;
pub mod observability;
pub mod rate_limit;
pub mod resilience;

pub use cache::TtlCache;
pub use config::ResilienceConfig;
pub use http::{ApiRequest, ClientError, ResilientClient};
pub use rate_limit::{RateLimitInfo, RateLimiter};
pub use resilience::{RetryHandler, RetryPolicy};
