//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (the loader handles presence and syntax)
//! - Check the endpoint is an absolute http(s) URL
//! - Validate value ranges (interval > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HealthCheckConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;
use url::Url;

use crate::config::schema::HealthCheckConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("HEALTH_ENDPOINT_URL {url:?} is not a valid URL: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HEALTH_ENDPOINT_URL {url:?} must use http or https, got {scheme}")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("CHECK_INTERVAL must be greater than zero")]
    ZeroInterval,

    #[error("PROBE_TIMEOUT must be greater than zero")]
    ZeroProbeTimeout,
}

pub fn validate_config(config: &HealthCheckConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.endpoint_url) {
        Ok(url) if !matches!(url.scheme(), "http" | "https") => {
            errors.push(ValidationError::UnsupportedScheme {
                url: config.endpoint_url.clone(),
                scheme: url.scheme().to_string(),
            });
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::InvalidUrl {
            url: config.endpoint_url.clone(),
            reason: e.to_string(),
        }),
    }

    if config.check_interval.is_zero() {
        errors.push(ValidationError::ZeroInterval);
    }

    if config.probe_timeout.is_some_and(|t| t.is_zero()) {
        errors.push(ValidationError::ZeroProbeTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
