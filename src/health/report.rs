//! Per-tick summary and the shared "latest tick" slot.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use serde::Serialize;

use crate::alert::AlertReason;
use crate::parsing::HealthLevel;

/// How a tick ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TickOutcome {
    Healthy,
    SustainedDegradation,
    Unhealthy,
    TransportFailure,
}

/// Everything observable about one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub endpoint: String,
    pub service: &'static str,
    pub service_id: Option<String>,
    /// Probes sent, successful or not.
    pub probes: u32,
    /// Response bodies handed to the parser.
    pub classified: u32,
    pub backoff_secs: Vec<u64>,
    pub alerts: Vec<AlertReason>,
    pub outcome: TickOutcome,
    pub last_status: Option<u16>,
    pub last_level: Option<HealthLevel>,
    pub last_response_time_ms: Option<u64>,
}

impl TickReport {
    pub(crate) fn new(tick: u64, endpoint: &str, service: &'static str) -> Self {
        Self {
            tick,
            endpoint: endpoint.to_string(),
            service,
            service_id: None,
            probes: 0,
            classified: 0,
            backoff_secs: Vec::new(),
            alerts: Vec::new(),
            outcome: TickOutcome::Healthy,
            last_status: None,
            last_level: None,
            last_response_time_ms: None,
        }
    }

    pub(crate) fn record_response(&mut self, status: u16, elapsed: Duration) {
        self.last_status = Some(status);
        self.last_response_time_ms = Some(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX));
    }

    pub fn backoffs(&self) -> Vec<Duration> {
        self.backoff_secs.iter().map(|s| Duration::from_secs(*s)).collect()
    }
}

/// Latest completed tick, shared between the monitor and the status server.
#[derive(Debug, Clone, Default)]
pub struct StatusBoard {
    latest: Arc<ArcSwapOption<TickReport>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, report: TickReport) {
        self.latest.store(Some(Arc::new(report)));
    }

    pub fn latest(&self) -> Option<Arc<TickReport>> {
        self.latest.load_full()
    }
}
