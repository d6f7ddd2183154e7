//! Client error definitions.

use thiserror::Error;

use crate::http::response::{extract_error_message, is_retryable};
use crate::rate_limit::{RateLimitError, RateLimitInfo};
use crate::resilience::timeouts::TimeoutError;

/// Errors that can occur while fetching from the upstream API.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// 401 from upstream.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// 404 from upstream.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// 429 from upstream.
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Upstream reported zero remaining requests in its rate limit headers.
    #[error("Rate limit exhausted: {} of {} requests used, resets at {}", .0.used, .0.limit, .0.reset)]
    QuotaExhausted(RateLimitInfo),

    /// 5xx from upstream.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Any other status >= 400.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Body of a successful response was not JSON.
    #[error("Invalid JSON response: {0}")]
    InvalidJson(String),

    /// The request never produced a response (connect, TLS, I/O, timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Client could not be built from its configuration.
    #[error("Invalid client configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Timeout(#[from] TimeoutError),

    #[error(transparent)]
    RateLimit(#[from] RateLimitError),
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Map a non-success response to its error variant.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = extract_error_message(body);
        match status {
            401 => ClientError::Authentication(message),
            404 => ClientError::NotFound(message),
            429 => ClientError::RateLimited(message),
            500..=599 => ClientError::Server { status, message },
            _ => ClientError::Http { status, message },
        }
    }

    /// Whether another attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Transport(_) | ClientError::Timeout(_) => true,
            ClientError::RateLimited(_) => is_retryable(429),
            ClientError::Server { status, .. } | ClientError::Http { status, .. } => {
                is_retryable(*status)
            }
            _ => false,
        }
    }

    /// Status code of the upstream response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Authentication(_) => Some(401),
            ClientError::NotFound(_) => Some(404),
            ClientError::RateLimited(_) => Some(429),
            ClientError::Server { status, .. } | ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
