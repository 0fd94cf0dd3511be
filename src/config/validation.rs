//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (counts positive, threshold a fraction)
//! - Validate the target base address actually parses as an http(s) URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function over the config
//! - Runs before any run starts; an invalid config never dispatches

use thiserror::Error;
use url::Url;

use crate::config::schema::{DispatchConfig, HarnessConfig};

/// One semantic violation in a config.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Validate the full harness configuration.
pub fn validate_config(config: &HarnessConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.trim().is_empty() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            "must not be empty",
        ));
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "listener.request_timeout_secs",
            "must be positive",
        ));
    }

    if let Err(dispatch_errors) = validate_dispatch_config(&config.dispatch) {
        errors.extend(dispatch_errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate the dispatch section on its own; also used by the dispatcher
/// at construction time.
pub fn validate_dispatch_config(config: &DispatchConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            "dispatch.base_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "dispatch.base_url",
            format!("not a valid URL: {}", e),
        )),
    }

    if config.max_concurrent_requests == 0 {
        errors.push(ValidationError::new(
            "dispatch.max_concurrent_requests",
            "must be positive",
        ));
    }
    if !(0.0..=1.0).contains(&config.failure_threshold) {
        errors.push(ValidationError::new(
            "dispatch.failure_threshold",
            format!("must be in [0, 1], got {}", config.failure_threshold),
        ));
    }
    if config.min_sample_size == 0 {
        errors.push(ValidationError::new(
            "dispatch.min_sample_size",
            "must be positive",
        ));
    }
    if config.max_retry_attempts == 0 {
        errors.push(ValidationError::new(
            "dispatch.max_retry_attempts",
            "must be positive",
        ));
    }
    if config.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "dispatch.request_timeout_secs",
            "must be positive",
        ));
    }
    if config.backoff_base_ms == 0 {
        errors.push(ValidationError::new(
            "dispatch.backoff_base_ms",
            "must be positive",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&HarnessConfig::default()).is_ok());
    }

    #[test]
    fn test_all_errors_are_collected() {
        let config = DispatchConfig {
            base_url: "not a url".into(),
            max_concurrent_requests: 0,
            failure_threshold: 1.5,
            min_sample_size: 0,
            ..DispatchConfig::default()
        };

        let errors = validate_dispatch_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert!(fields.contains(&"dispatch.failure_threshold"));
        assert!(fields.contains(&"dispatch.min_sample_size"));
    }

    #[test]
    fn test_threshold_bounds_inclusive() {
        for threshold in [0.0, 1.0] {
            let config = DispatchConfig {
                failure_threshold: threshold,
                ..DispatchConfig::default()
            };
            assert!(validate_dispatch_config(&config).is_ok());
        }
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let config = DispatchConfig {
            base_url: "ftp://example.com".into(),
            ..DispatchConfig::default()
        };
        let errors = validate_dispatch_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "dispatch.base_url");
    }
}
