//! Status server.
//!
//! # Routes
//! - `GET /health`: liveness of the checker process
//! - `GET /status`: latest tick summary as JSON
//! - `GET /metrics`: Prometheus exposition
//!
//! # Design Decisions
//! - Read-only; nothing here can change monitor behaviour
//! - Stops on the same shutdown trigger as the monitor

pub mod handlers;

use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::health::StatusBoard;
use crate::lifecycle::ShutdownSignal;
use self::handlers::*;

#[derive(Clone)]
pub struct AppState {
    pub board: StatusBoard,
    pub metrics: Option<PrometheusHandle>,
}

pub fn setup_status_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(get_health))
        .route("/status", get(get_status))
        .route("/metrics", get(get_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the status router until shutdown is signalled.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    mut shutdown: ShutdownSignal,
) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "Status server listening");

    axum::serve(listener, setup_status_router(state))
        .with_graceful_shutdown(async move {
            shutdown.recv().await;
        })
        .await
}
