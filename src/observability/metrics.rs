//! Metrics collection and exposition.
//!
//! # Metrics
//! - `healthcheck_http_response_time_seconds` (histogram): probe latency by endpoint
//! - `healthcheck_http_response_total` (counter): probe responses by status code
//! - `healthcheck_alerts_total` (counter): alerts raised by reason
//!
//! # Design Decisions
//! - Recorded once per probe attempt, retried attempts included
//! - Transport failures record nothing (there is no status to label)
//! - The monitor depends on `MetricsSink`, not on the global recorder

use std::collections::HashMap;
use std::sync::Mutex;

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

use crate::alert::AlertReason;

pub const RESPONSE_TIME: &str = "healthcheck_http_response_time_seconds";
pub const RESPONSE_TOTAL: &str = "healthcheck_http_response_total";
pub const ALERTS_TOTAL: &str = "healthcheck_alerts_total";

const LATENCY_BUCKETS: [f64; 11] = [0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Where the monitor sends per-attempt measurements.
pub trait MetricsSink: Send + Sync {
    fn observe_latency(&self, endpoint: &str, seconds: f64);

    fn increment_status_count(&self, status: &str);

    fn record_alert(&self, _reason: AlertReason) {}
}

/// Install the global Prometheus recorder and describe our metrics.
///
/// The returned handle renders the exposition text for `/metrics`.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full(RESPONSE_TIME.to_string()), &LATENCY_BUCKETS)?
        .install_recorder()?;

    describe_histogram!(RESPONSE_TIME, Unit::Seconds, "Http response times in seconds");
    describe_counter!(RESPONSE_TOTAL, "The total number of HTTP responses");
    describe_counter!(ALERTS_TOTAL, "The total number of alerts raised");

    Ok(handle)
}

/// Sink backed by the `metrics` facade (and so by whatever recorder is installed).
#[derive(Debug, Clone, Copy, Default)]
pub struct PrometheusMetrics;

impl MetricsSink for PrometheusMetrics {
    fn observe_latency(&self, endpoint: &str, seconds: f64) {
        histogram!(RESPONSE_TIME, "endpoint" => endpoint.to_string()).record(seconds);
    }

    fn increment_status_count(&self, status: &str) {
        counter!(RESPONSE_TOTAL, "http_status_code" => status.to_string()).increment(1);
    }

    fn record_alert(&self, reason: AlertReason) {
        counter!(ALERTS_TOTAL, "reason" => reason.as_str()).increment(1);
    }
}

/// In-memory sink, handy for asserting what a tick recorded.
#[derive(Debug, Default)]
pub struct RecordingMetrics {
    inner: Mutex<Recorded>,
}

#[derive(Debug, Default, Clone)]
pub struct Recorded {
    pub latencies: Vec<(String, f64)>,
    pub status_counts: HashMap<String, u64>,
    pub alerts: HashMap<AlertReason, u64>,
}

impl RecordingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Recorded {
        self.inner.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn status_count(&self, status: &str) -> u64 {
        self.snapshot().status_counts.get(status).copied().unwrap_or(0)
    }

    pub fn latency_observations(&self) -> usize {
        self.snapshot().latencies.len()
    }
}

impl MetricsSink for RecordingMetrics {
    fn observe_latency(&self, endpoint: &str, seconds: f64) {
        if let Ok(mut r) = self.inner.lock() {
            r.latencies.push((endpoint.to_string(), seconds));
        }
    }

    fn increment_status_count(&self, status: &str) {
        if let Ok(mut r) = self.inner.lock() {
            *r.status_counts.entry(status.to_string()).or_default() += 1;
        }
    }

    fn record_alert(&self, reason: AlertReason) {
        if let Ok(mut r) = self.inner.lock() {
            *r.alerts.entry(reason).or_default() += 1;
        }
    }
}
