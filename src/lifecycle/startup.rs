//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the prober, monitor and status server from a validated config
//! - Run the monitor on the current task until it stops
//! - Stop the status server once the monitor is done
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener binds before the first tick so `/health` answers immediately

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::admin::{self, AppState};
use crate::alert::{LogNotifier, Notifier};
use crate::config::HealthCheckConfig;
use crate::health::{HealthMonitor, HttpProber, MonitorError, StatusBoard};
use crate::lifecycle::Shutdown;
use crate::observability::metrics::{MetricsSink, PrometheusMetrics};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("building HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("binding status server on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Monitor(#[from] MonitorError),
}

/// Collaborators injected into the running checker.
pub struct Components {
    pub metrics: Arc<dyn MetricsSink>,
    pub notifier: Arc<dyn Notifier>,
    pub prometheus: Option<PrometheusHandle>,
}

impl Default for Components {
    fn default() -> Self {
        Self {
            metrics: Arc::new(PrometheusMetrics),
            notifier: Arc::new(LogNotifier::default()),
            prometheus: None,
        }
    }
}

/// Run the checker until `shutdown` fires (`Ok`) or the monitor fails.
pub async fn run(
    config: HealthCheckConfig,
    components: Components,
    shutdown: Shutdown,
) -> Result<(), StartupError> {
    let server_shutdown = shutdown.subscribe();
    let monitor_shutdown = shutdown.subscribe();
    let prober = HttpProber::new(config.endpoint_url.clone(), config.probe_timeout)?;

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;

    let board = StatusBoard::new();
    let state = AppState {
        board: board.clone(),
        metrics: components.prometheus,
    };
    let server = tokio::spawn(admin::serve(listener, state, server_shutdown));

    tracing::info!(
        endpoint = %config.endpoint_url,
        instance = %config.instance,
        parser = config.parser.as_str(),
        check_interval_ms = config.check_interval.as_millis() as u64,
        response_time_threshold_ms = config.response_time_threshold.as_millis() as u64,
        "Configuration loaded"
    );

    let monitor = HealthMonitor::new(
        config,
        Arc::new(prober),
        components.metrics,
        components.notifier,
    )
    .with_status_board(board);

    let result = monitor.run(monitor_shutdown).await;

    shutdown.trigger();
    match server.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!(error = %e, "Status server stopped with error"),
        Err(e) => tracing::warn!(error = %e, "Status server task failed"),
    }

    result.map_err(StartupError::from)
}
