//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (limits > 0, durations within bounds, delays ordered)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ResilienceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::ResilienceConfig;

/// Upper bound for every duration given in seconds: one year.
pub const MAX_DURATION_SECS: u64 = 365 * 24 * 60 * 60;

/// A single semantic problem with a configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `rate_limit.limit`.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check every section and collect all problems.
pub fn validate_config(config: &ResilienceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = Url::parse(&config.client.base_url) {
        errors.push(ValidationError::new(
            "client.base_url",
            format!("invalid URL '{}': {}", config.client.base_url, e),
        ));
    }
    check_duration(&mut errors, "client.timeout_secs", config.client.timeout_secs);

    if config.rate_limit.limit == 0 {
        errors.push(ValidationError::new("rate_limit.limit", "must be greater than 0"));
    }
    check_duration(&mut errors, "rate_limit.window_secs", config.rate_limit.window_secs);
    if let Some(max_wait) = config.rate_limit.max_wait_secs {
        check_duration(&mut errors, "rate_limit.max_wait_secs", max_wait);
    }

    if config.cache.max_size == 0 {
        errors.push(ValidationError::new("cache.max_size", "must be greater than 0"));
    }
    check_duration(&mut errors, "cache.default_ttl_secs", config.cache.default_ttl_secs);

    if config.retries.base_delay_ms > config.retries.max_delay_ms {
        errors.push(ValidationError::new(
            "retries.base_delay_ms",
            format!(
                "base delay {}ms exceeds max delay {}ms",
                config.retries.base_delay_ms, config.retries.max_delay_ms
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_duration(errors: &mut Vec<ValidationError>, field: &'static str, secs: u64) {
    if secs == 0 {
        errors.push(ValidationError::new(field, "must be greater than 0"));
    } else if secs > MAX_DURATION_SECS {
        errors.push(ValidationError::new(
            field,
            format!("{}s exceeds the maximum of {}s", secs, MAX_DURATION_SECS),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ResilienceConfig::default()).is_ok());
    }

    #[test]
    fn test_all_errors_are_reported() {
        let mut config = ResilienceConfig::default();
        config.client.base_url = "not a url".to_string();
        config.rate_limit.limit = 0;
        config.rate_limit.window_secs = 0;
        config.cache.max_size = 0;
        config.retries.base_delay_ms = 5000;
        config.retries.max_delay_ms = 100;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "client.base_url",
                "rate_limit.limit",
                "rate_limit.window_secs",
                "cache.max_size",
                "retries.base_delay_ms",
            ]
        );
    }

    #[test]
    fn test_oversized_durations_are_rejected() {
        let mut config = ResilienceConfig::default();
        config.client.timeout_secs = u64::MAX;
        config.rate_limit.window_secs = i64::MAX as u64;
        config.rate_limit.max_wait_secs = Some(MAX_DURATION_SECS + 1);
        config.cache.default_ttl_secs = i64::MAX as u64;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "client.timeout_secs",
                "rate_limit.window_secs",
                "rate_limit.max_wait_secs",
                "cache.default_ttl_secs",
            ]
        );
        assert!(errors[1].message.contains("exceeds the maximum"));
    }

    #[test]
    fn test_one_year_is_accepted() {
        let mut config = ResilienceConfig::default();
        config.rate_limit.window_secs = MAX_DURATION_SECS;
        config.cache.default_ttl_secs = MAX_DURATION_SECS;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_error_display() {
        let err = ValidationError::new("rate_limit.limit", "must be greater than 0");
        assert_eq!(err.to_string(), "rate_limit.limit: must be greater than 0");
    }
}
