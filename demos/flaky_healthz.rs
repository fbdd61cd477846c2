//! Flaky endpoint for trying the checker by hand.
//!
//! ```text
//! cargo run --example flaky_healthz
//! HEALTH_ENDPOINT_URL=http://127.0.0.1:8941/_cluster/health CHECK_INTERVAL=5s \
//!     RESPONSE_TIME_THRESHOLD=200ms PARSER=elasticsearch cargo run
//! ```

use axum::{http::StatusCode, routing::get, Json, Router};
use rand::Rng;
use serde_json::{json, Value};
use std::net::SocketAddr;

const FAIL_PERCENT: u32 = 25;

async fn healthz() -> StatusCode {
    if rand::thread_rng().gen_range(0..100) < FAIL_PERCENT {
        tracing::warn!(code = 503, "returning failure");
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    }
}

async fn cluster_health() -> Json<Value> {
    let status = match rand::thread_rng().gen_range(0..100) {
        0..=69 => "green",
        70..=89 => "yellow",
        _ => "red",
    };
    tracing::info!(status, "cluster health");
    Json(json!({ "cluster_name": "demo", "status": status }))
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/_cluster/health", get(cluster_health));

    let addr = SocketAddr::from(([127, 0, 0, 1], 8941));
    tracing::info!(address = %addr, "starting flaky-healthz");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}
