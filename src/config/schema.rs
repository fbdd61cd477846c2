//! Configuration schema definitions.

use std::time::Duration;

use crate::parsing::Parser;

pub const DEFAULT_INSTANCE: &str = "local";
pub const DEFAULT_PORT: u16 = 8989;

/// Root configuration for the health checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthCheckConfig {
    /// Endpoint to probe (e.g., "http://localhost:9200/_cluster/health").
    pub endpoint_url: String,

    /// Time between ticks.
    pub check_interval: Duration,

    /// Latency above which a probe logs a warning.
    pub response_time_threshold: Duration,

    /// Which parser interprets the response body.
    pub parser: Parser,

    /// Instance label attached to every log line.
    pub instance: String,

    /// Port for the status and metrics server.
    pub port: u16,

    /// Optional per-request timeout for probes. `None` leaves the transport default.
    pub probe_timeout: Option<Duration>,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            endpoint_url: String::new(),
            check_interval: Duration::from_secs(5),
            response_time_threshold: Duration::from_secs(2),
            parser: Parser::Default,
            instance: DEFAULT_INSTANCE.to_string(),
            port: DEFAULT_PORT,
            probe_timeout: None,
        }
    }
}
