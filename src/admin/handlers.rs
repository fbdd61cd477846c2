use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::admin::AppState;
use crate::health::TickReport;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
}

/// Liveness of the checker itself, not of the monitored endpoint.
pub async fn get_health() -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "healthy",
    })
}

/// Summary of the most recent tick; 404 until the first tick completes.
pub async fn get_status(State(state): State<AppState>) -> Result<Json<TickReport>, StatusCode> {
    state
        .board
        .latest()
        .map(|report| Json(report.as_ref().clone()))
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn get_metrics(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .ok_or(StatusCode::NOT_FOUND)
}
