//! Response body parsing.
//!
//! # Data Flow
//! ```text
//! Probe response body (bytes)
//!     → Parser::parse (dispatch on the configured kind)
//!     → ParseResult { level, service_id }
//!     → retry policy decides what to do with the level
//! ```
//!
//! # Design Decisions
//! - Parsers are a closed enum; adding a backend means adding a variant
//! - Parsers never look at the HTTP status code, that signal belongs to the monitor
//! - A body that cannot be decoded is an error, not a health level

pub mod elastic;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Health classification of the probed service, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthLevel {
    #[default]
    Healthy,
    Degraded,
    Unhealthy,
}

impl std::fmt::Display for HealthLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HealthLevel::Healthy => "healthy",
            HealthLevel::Degraded => "degraded",
            HealthLevel::Unhealthy => "unhealthy",
        };
        f.write_str(s)
    }
}

/// Normalized result of parsing one response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub level: HealthLevel,
    pub service_id: String,
}

/// Errors raised when a body does not have the shape a parser expects.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("parsing {service} response: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Active response parser. Stateless; chosen once from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Parser {
    /// Reports every response as healthy.
    #[default]
    Default,
    /// Reads an Elasticsearch `_cluster/health` payload.
    Elasticsearch,
}

impl Parser {
    /// Look up a parser by its configuration key.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "default" => Some(Parser::Default),
            "elasticsearch" => Some(Parser::Elasticsearch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Parser::Default => "default",
            Parser::Elasticsearch => "elasticsearch",
        }
    }

    /// Classify a raw response body.
    pub fn parse(&self, body: &[u8]) -> Result<ParseResult, ParseError> {
        match self {
            Parser::Default => Ok(ParseResult {
                level: HealthLevel::Healthy,
                service_id: "unknown".to_string(),
            }),
            Parser::Elasticsearch => elastic::parse_cluster_health(body),
        }
    }

    /// Static label used to tag logs and alerts.
    pub fn service_name(&self) -> &'static str {
        match self {
            Parser::Default => "unknown",
            Parser::Elasticsearch => elastic::SERVICE_NAME,
        }
    }
}
