//! Endpoint health checker.
//!
//! Probes one HTTP health endpoint on a fixed interval, classifies the
//! response, retries degraded results with exponential backoff and alerts
//! on sustained or hard failure.
//!
//! # Architecture Overview
//!
//! ```text
//!  ticker ──tick──▶ monitor ──GET──▶ prober ──────────▶ endpoint
//!                      │
//!                      ├──body──▶ parsing ──level──▶ retry policy
//!                      │                                  │
//!                      │            sleep 2^attempt s ◀───┤ degraded
//!                      │                                  │
//!                      ├──▶ metrics (latency, status)     │ unhealthy / ceiling
//!                      ├──▶ alert ◀───────────────────────┘
//!                      └──▶ status board ──▶ /health /status /metrics
//! ```
//!
//! # Exit codes
//! - 1: configuration error, startup error, or shutdown signal
//! - 2: a response body could not be parsed

use std::process::ExitCode;

use health_checker::config::load_config;
use health_checker::lifecycle::startup::{self, Components, StartupError};
use health_checker::lifecycle::Shutdown;
use health_checker::observability::logging::{init_logging, LogFormat};
use health_checker::observability::metrics::init_metrics;

#[tokio::main]
async fn main() -> ExitCode {
    init_logging(LogFormat::from_env());

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting health checker");

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Error loading config");
            return ExitCode::from(1);
        }
    };

    let mut components = Components::default();
    match init_metrics() {
        Ok(handle) => components.prometheus = Some(handle),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics recorder"),
    }

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    match startup::run(config, components, shutdown).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::from(1)
        }
        Err(StartupError::Monitor(e)) => {
            tracing::error!(error = %e, "Health monitor stopped on a fatal error");
            ExitCode::from(2)
        }
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            ExitCode::from(1)
        }
    }
}
