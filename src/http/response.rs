//! Response classification.
//!
//! # Responsibilities
//! - Read upstream rate limit headers into a [`RateLimitInfo`]
//! - Decide whether a status code is worth retrying
//! - Pull a human-readable message out of an error body
//!
//! # Design Decisions
//! - Pure functions, no shared state
//! - Missing or malformed headers mean "no information", never an error
//! - Bodies that are not JSON objects are passed through unchanged

use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::rate_limit::RateLimitInfo;

pub const RATE_LIMIT_LIMIT: &str = "x-ratelimit-limit";
pub const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";
pub const RATE_LIMIT_RESET: &str = "x-ratelimit-reset";

/// Status codes that indicate a transient upstream condition.
pub const RETRYABLE_STATUS_CODES: [u16; 5] = [429, 500, 502, 503, 504];

/// Parse the upstream rate limit headers.
///
/// Returns `None` unless all three headers are present and numeric.
pub fn parse_rate_limit(headers: &HeaderMap) -> Option<RateLimitInfo> {
    let limit = header_str(headers, RATE_LIMIT_LIMIT)?.parse::<u32>().ok()?;
    let remaining = header_str(headers, RATE_LIMIT_REMAINING)?.parse::<u32>().ok()?;
    let reset = header_str(headers, RATE_LIMIT_RESET)?
        .parse::<f64>()
        .ok()
        .filter(|reset| reset.is_finite())?;

    Some(RateLimitInfo::new(limit, remaining, reset))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name)?.to_str().ok().map(str::trim)
}

/// True for 429 and the transient 5xx codes.
pub fn is_retryable(status: u16) -> bool {
    RETRYABLE_STATUS_CODES.contains(&status)
}

/// True once the upstream reports no remaining requests.
pub fn is_quota_exhausted(info: &RateLimitInfo) -> bool {
    info.is_exhausted()
}

/// Extract the error message from a response body.
pub fn extract_error_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("message") {
            Some(Value::String(message)) => message.clone(),
            Some(other) => other.to_string(),
            None => Value::Object(map).to_string(),
        },
        _ => body.to_string(),
    }
}
