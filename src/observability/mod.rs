//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Limiter, cache, retry handler and client produce:
//!     → logging.rs (subscriber setup for structured tracing events)
//!     → metrics.rs (counters, gauges, histograms via the `metrics` facade)
//!
//! Consumers:
//!     → Whatever subscriber / recorder the host process installs
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event, never pre-formatted strings
//! - Request ID span wraps each client call
//! - Metrics are no-ops until the host installs a recorder

pub mod logging;
pub mod metrics;
