//! HTTP client subsystem.
//!
//! # Data Flow
//! ```text
//! ApiRequest (request.rs)
//!     → client.rs: cache lookup (hit → return)
//!     → client.rs: rate limit permit
//!     → client.rs: retry handler
//!         → transport.rs (single HTTP exchange → RawResponse)
//!         → response.rs (rate limit headers, retryability, error text)
//!         → types.rs (ClientError for non-success responses)
//!     → client.rs: cache populate
//!     → serde_json::Value to the caller
//! ```

pub mod client;
pub mod request;
pub mod response;
pub mod transport;
pub mod types;

pub use client::ResilientClient;
pub use request::ApiRequest;
pub use transport::{HttpTransport, RawResponse, ReqwestTransport};
pub use types::{ClientError, ClientResult};
