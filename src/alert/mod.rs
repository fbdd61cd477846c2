//! Alert delivery.
//!
//! # Responsibilities
//! - Define the alert payload raised by the monitor
//! - Deliver alerts to on-call (currently: structured error log)
//!
//! # Design Decisions
//! - Fire-and-forget: no delivery guarantee, no retry of the alert itself
//! - Notifiers are injected so tests can count alerts

use std::sync::Mutex;
use std::time::Duration;

use serde::Serialize;

/// Why an alert was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertReason {
    /// The GET itself failed (connect, DNS, timeout).
    TransportFailure,
    /// The endpoint answered with a non-200 status.
    UnhealthyEndpoint,
    /// The parser classified the service as unhealthy.
    UnhealthyService,
    /// Degraded on every attempt of a tick.
    SustainedDegradation,
}

impl AlertReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertReason::TransportFailure => "transport_failure",
            AlertReason::UnhealthyEndpoint => "unhealthy_endpoint",
            AlertReason::UnhealthyService => "unhealthy_service",
            AlertReason::SustainedDegradation => "sustained_degradation",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            AlertReason::TransportFailure => "Error getting endpoint",
            AlertReason::UnhealthyEndpoint => "Unhealthy endpoint",
            AlertReason::UnhealthyService => "Unhealthy service",
            AlertReason::SustainedDegradation => {
                "Service experiencing degradation over a long period of time"
            }
        }
    }
}

/// A single alert with the context the monitor had at the time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub reason: AlertReason,
    pub endpoint: String,
    pub service: &'static str,
    pub attempt: u32,
    pub status: Option<u16>,
    pub response_time: Option<Duration>,
    pub error: Option<String>,
}

impl Alert {
    pub fn message(&self) -> &'static str {
        self.reason.message()
    }
}

/// Outbound alert channel.
pub trait Notifier: Send + Sync {
    fn notify(&self, alert: &Alert);
}

/// Notifier that writes alerts to the structured log.
#[derive(Debug, Clone)]
pub struct LogNotifier {
    channel: String,
}

impl LogNotifier {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
        }
    }
}

impl Default for LogNotifier {
    fn default() -> Self {
        Self::new("#oncall")
    }
}

impl Notifier for LogNotifier {
    fn notify(&self, alert: &Alert) {
        tracing::error!(
            reason = alert.reason.as_str(),
            endpoint = %alert.endpoint,
            service = alert.service,
            attempt = alert.attempt,
            status = ?alert.status,
            response_time_ms = ?alert.response_time.map(|d| d.as_millis()),
            error = ?alert.error,
            channel = %self.channel,
            "{}",
            alert.message()
        );
    }
}

/// Notifier that keeps every alert in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<Alert>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().map(|a| a.clone()).unwrap_or_default()
    }

    pub fn reasons(&self) -> Vec<AlertReason> {
        self.alerts().iter().map(|a| a.reason).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, alert: &Alert) {
        if let Ok(mut alerts) = self.alerts.lock() {
            alerts.push(alert.clone());
        }
    }
}
