//! Configuration loading from the process environment.

use std::time::Duration;

use thiserror::Error;

use crate::config::duration::{parse_duration, DurationError};
use crate::config::schema::{HealthCheckConfig, DEFAULT_INSTANCE, DEFAULT_PORT};
use crate::config::validation::{validate_config, ValidationError};
use crate::parsing::Parser;

pub const ENV_ENDPOINT_URL: &str = "HEALTH_ENDPOINT_URL";
pub const ENV_CHECK_INTERVAL: &str = "CHECK_INTERVAL";
pub const ENV_RESPONSE_TIME_THRESHOLD: &str = "RESPONSE_TIME_THRESHOLD";
pub const ENV_PARSER: &str = "PARSER";
pub const ENV_INSTANCE: &str = "INSTANCE";
pub const ENV_PORT: &str = "PORT";
pub const ENV_PROBE_TIMEOUT: &str = "PROBE_TIMEOUT";

/// Error type for configuration loading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid {var}: {source}")]
    InvalidDuration {
        var: &'static str,
        #[source]
        source: DurationError,
    },

    #[error("{0} must not be empty")]
    Missing(&'static str),

    #[error("invalid PORT {value:?}: expected a port number")]
    InvalidPort { value: String },

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from the process environment.
pub fn load_config() -> Result<HealthCheckConfig, ConfigError> {
    load_from(|key| std::env::var(key).ok())
}

/// Load and validate configuration through an arbitrary variable lookup.
///
/// Unset variables and empty strings are treated alike.
pub fn load_from<F>(lookup: F) -> Result<HealthCheckConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).unwrap_or_default();

    let check_interval = required_duration(ENV_CHECK_INTERVAL, &var(ENV_CHECK_INTERVAL))?;
    let response_time_threshold =
        required_duration(ENV_RESPONSE_TIME_THRESHOLD, &var(ENV_RESPONSE_TIME_THRESHOLD))?;

    let endpoint_url = var(ENV_ENDPOINT_URL);
    if endpoint_url.is_empty() {
        return Err(ConfigError::Missing(ENV_ENDPOINT_URL));
    }

    let parser_key = var(ENV_PARSER);
    let parser = Parser::from_key(&parser_key).unwrap_or_else(|| {
        tracing::warn!(parser = %parser_key, "Missing parser configuration. Setting default parser");
        Parser::Default
    });

    let instance = match var(ENV_INSTANCE) {
        s if s.is_empty() => DEFAULT_INSTANCE.to_string(),
        s => s,
    };

    let port = match var(ENV_PORT) {
        s if s.is_empty() => DEFAULT_PORT,
        s => s.parse().map_err(|_| ConfigError::InvalidPort { value: s })?,
    };

    let probe_timeout = match var(ENV_PROBE_TIMEOUT) {
        s if s.is_empty() => None,
        s => Some(required_duration(ENV_PROBE_TIMEOUT, &s)?),
    };

    let config = HealthCheckConfig {
        endpoint_url,
        check_interval,
        response_time_threshold,
        parser,
        instance,
        port,
        probe_timeout,
    };

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn required_duration(var: &'static str, value: &str) -> Result<Duration, ConfigError> {
    parse_duration(value).map_err(|source| ConfigError::InvalidDuration { var, source })
}
