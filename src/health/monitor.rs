//! Periodic health monitor.
//!
//! # Responsibilities
//! - Wake on every tick of the check interval
//! - Run one bounded probe/retry sequence per tick
//! - Raise alerts, record metrics, publish the tick summary
//!
//! # States
//! ```text
//! Idle ──tick──▶ Ticked ──▶ Retrying ──(healthy | unhealthy | ceiling | transport error)──▶ Idle
//!                              │  ▲
//!                              └──┘ degraded: sleep 2^attempt s
//! Running ──shutdown──▶ Stopped (run returns to its owner)
//! ```
//!
//! # Design Decisions
//! - A tick always finishes, backoff sleeps included, before the next tick starts
//! - Ticks missed while a tick is running collapse into one; they never queue up
//! - Shutdown is only observed between ticks
//! - A body the parser cannot read is fatal and ends `run` with an error

use std::sync::Arc;

use thiserror::Error;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::Instrument;

use crate::alert::{Alert, AlertReason, Notifier};
use crate::config::HealthCheckConfig;
use crate::health::probe::{Probe, ProbeResponse};
use crate::health::report::{StatusBoard, TickOutcome, TickReport};
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics::MetricsSink;
use crate::parsing::{ParseError, Parser};
use crate::resilience::retries::{RetryDecision, RetryState};

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("parsing failure: {0}")]
    Parse(#[from] ParseError),
}

pub struct HealthMonitor {
    config: HealthCheckConfig,
    parser: Parser,
    prober: Arc<dyn Probe>,
    metrics: Arc<dyn MetricsSink>,
    notifier: Arc<dyn Notifier>,
    status: Option<StatusBoard>,
}

impl HealthMonitor {
    pub fn new(
        config: HealthCheckConfig,
        prober: Arc<dyn Probe>,
        metrics: Arc<dyn MetricsSink>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            parser: config.parser,
            config,
            prober,
            metrics,
            notifier,
            status: None,
        }
    }

    /// Publish every finished tick to `board`.
    pub fn with_status_board(mut self, board: StatusBoard) -> Self {
        self.status = Some(board);
        self
    }

    /// Run until shutdown is signalled (`Ok`) or a response cannot be parsed (`Err`).
    pub async fn run(self, mut shutdown: ShutdownSignal) -> Result<(), MonitorError> {
        let period = self.config.check_interval;
        tracing::info!(
            endpoint = %self.config.endpoint_url,
            interval_ms = period.as_millis() as u64,
            parser = self.parser.service_name(),
            "Health monitor starting"
        );

        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut tick: u64 = 0;

        loop {
            tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    tracing::info!("Health monitor received shutdown signal, exiting loop");
                    return Ok(());
                }
                _ = ticker.tick() => {
                    tick += 1;
                    let report = self.run_tick(tick).await?;
                    if let Some(board) = &self.status {
                        board.publish(report);
                    }
                }
            }
        }
    }

    /// One tick: probe until the retry state says stop.
    pub async fn run_tick(&self, tick: u64) -> Result<TickReport, MonitorError> {
        let span = tracing::info_span!(
            "tick",
            tick,
            endpoint = %self.config.endpoint_url,
            instance = %self.config.instance
        );
        self.retry_loop(tick).instrument(span).await
    }

    async fn retry_loop(&self, tick: u64) -> Result<TickReport, MonitorError> {
        let mut report = TickReport::new(tick, &self.config.endpoint_url, self.parser.service_name());
        let mut retry = RetryState::new();

        while retry.should_continue() {
            report.probes += 1;
            let attempt = retry.attempt();

            let response = match self.prober.probe().await {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!(attempt, error = %e, "HTTP error");
                    self.raise(
                        &mut report,
                        Alert {
                            reason: AlertReason::TransportFailure,
                            endpoint: self.config.endpoint_url.clone(),
                            service: self.parser.service_name(),
                            attempt,
                            status: None,
                            response_time: None,
                            error: Some(e.to_string()),
                        },
                    );
                    report.outcome = TickOutcome::TransportFailure;
                    retry.stop();
                    continue;
                }
            };

            let span = tracing::info_span!(
                "probe",
                service = self.parser.service_name(),
                attempt,
                status = response.status,
                response_time_ms = response.elapsed.as_millis() as u64
            );
            self.handle_response(&mut retry, &mut report, response)
                .instrument(span)
                .await?;
        }

        Ok(report)
    }

    async fn handle_response(
        &self,
        retry: &mut RetryState,
        report: &mut TickReport,
        response: ProbeResponse,
    ) -> Result<(), MonitorError> {
        let attempt = retry.attempt();
        let threshold = self.config.response_time_threshold;
        report.record_response(response.status, response.elapsed);

        if response.elapsed > threshold {
            tracing::warn!(
                response_threshold_ms = threshold.as_millis() as u64,
                "Response time exceeded threshold"
            );
        }

        if !response.is_ok() {
            self.raise(report, self.alert(AlertReason::UnhealthyEndpoint, attempt, &response));
        }

        self.metrics
            .observe_latency(&self.config.endpoint_url, response.elapsed.as_secs_f64());
        self.metrics
            .increment_status_count(&response.status.to_string());

        report.classified += 1;
        let result = self.parser.parse(&response.body).map_err(|e| {
            tracing::error!(error = %e, "Parsing failure");
            e
        })?;
        report.last_level = Some(result.level);
        report.service_id = Some(result.service_id);

        match retry.advance(result.level) {
            RetryDecision::Done => {
                report.outcome = TickOutcome::Healthy;
                tracing::info!("Finished tick");
            }
            RetryDecision::Backoff(delay) => {
                tracing::warn!(
                    sleep_secs = delay.as_secs(),
                    "Retrying expected transient error with exponential backoff"
                );
                report.backoff_secs.push(delay.as_secs());
                time::sleep(delay).await;
            }
            RetryDecision::SustainedDegradation => {
                tracing::error!(
                    attempts = attempt,
                    "Retry of expected transient failure did not succeed"
                );
                report.outcome = TickOutcome::SustainedDegradation;
                self.raise(report, self.alert(AlertReason::SustainedDegradation, attempt, &response));
            }
            RetryDecision::Unhealthy => {
                report.outcome = TickOutcome::Unhealthy;
                self.raise(report, self.alert(AlertReason::UnhealthyService, attempt, &response));
            }
        }

        Ok(())
    }

    fn alert(&self, reason: AlertReason, attempt: u32, response: &ProbeResponse) -> Alert {
        Alert {
            reason,
            endpoint: self.config.endpoint_url.clone(),
            service: self.parser.service_name(),
            attempt,
            status: Some(response.status),
            response_time: Some(response.elapsed),
            error: None,
        }
    }

    fn raise(&self, report: &mut TickReport, alert: Alert) {
        report.alerts.push(alert.reason);
        self.metrics.record_alert(alert.reason);
        self.notifier.notify(&alert);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::RecordingNotifier;
    use crate::health::probe::TransportError;
    use crate::lifecycle::Shutdown;
    use crate::observability::metrics::RecordingMetrics;
    use crate::parsing::HealthLevel;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Replays a fixed list of outcomes, then answers 200/green forever.
    struct ScriptedProber {
        script: Mutex<VecDeque<Result<ProbeResponse, TransportError>>>,
        calls: AtomicU32,
    }

    impl ScriptedProber {
        fn new(script: Vec<Result<ProbeResponse, TransportError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Probe for ScriptedProber {
        async fn probe(&self) -> Result<ProbeResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(es(200, "green")))
        }
    }

    fn es(status: u16, colour: &str) -> ProbeResponse {
        ProbeResponse {
            status,
            body: Bytes::from(format!(r#"{{"cluster_name":"c1","status":"{colour}"}}"#)),
            elapsed: Duration::from_millis(20),
        }
    }

    fn config(parser: Parser) -> HealthCheckConfig {
        HealthCheckConfig {
            endpoint_url: "http://localhost:9200/_cluster/health".into(),
            check_interval: Duration::from_secs(5),
            response_time_threshold: Duration::from_secs(2),
            parser,
            ..Default::default()
        }
    }

    struct Harness {
        monitor: HealthMonitor,
        prober: Arc<ScriptedProber>,
        metrics: Arc<RecordingMetrics>,
        notifier: Arc<RecordingNotifier>,
    }

    fn harness(parser: Parser, script: Vec<Result<ProbeResponse, TransportError>>) -> Harness {
        let prober = ScriptedProber::new(script);
        let metrics = Arc::new(RecordingMetrics::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let monitor = HealthMonitor::new(
            config(parser),
            prober.clone(),
            metrics.clone(),
            notifier.clone(),
        );
        Harness {
            monitor,
            prober,
            metrics,
            notifier,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_green_tick_is_quiet() {
        let h = harness(Parser::Elasticsearch, vec![Ok(es(200, "green"))]);

        let report = h.monitor.run_tick(1).await.unwrap();

        assert_eq!(h.prober.calls(), 1);
        assert_eq!(report.outcome, TickOutcome::Healthy);
        assert!(report.backoff_secs.is_empty());
        assert!(h.notifier.alerts().is_empty());
        assert_eq!(h.metrics.latency_observations(), 1);
        assert_eq!(h.metrics.status_count("200"), 1);
        assert_eq!(report.service_id.as_deref(), Some("c1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sustained_degradation_hits_ceiling() {
        let script = (0..4).map(|_| Ok(es(200, "yellow"))).collect();
        let h = harness(Parser::Elasticsearch, script);
        let start = Instant::now();

        let report = h.monitor.run_tick(1).await.unwrap();

        assert_eq!(h.prober.calls(), 4);
        assert_eq!(report.probes, 4);
        assert_eq!(report.backoff_secs, vec![2, 4, 8]);
        assert!(start.elapsed() >= Duration::from_secs(14));
        assert!(start.elapsed() < Duration::from_secs(15));
        assert_eq!(report.outcome, TickOutcome::SustainedDegradation);
        assert_eq!(h.notifier.reasons(), vec![AlertReason::SustainedDegradation]);
        assert_eq!(h.metrics.status_count("200"), 4);
        assert_eq!(h.metrics.latency_observations(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_three_degraded_attempts() {
        let mut script: Vec<_> = (0..3).map(|_| Ok(es(200, "yellow"))).collect();
        script.push(Ok(es(200, "green")));
        let h = harness(Parser::Elasticsearch, script);
        let start = Instant::now();

        let report = h.monitor.run_tick(1).await.unwrap();

        assert_eq!(h.prober.calls(), 4);
        assert_eq!(report.backoffs(), vec![
            Duration::from_secs(2),
            Duration::from_secs(4),
            Duration::from_secs(8),
        ]);
        assert!(start.elapsed() >= Duration::from_secs(14));
        assert!(start.elapsed() < Duration::from_secs(15));
        assert_eq!(report.outcome, TickOutcome::Healthy);
        assert!(h.notifier.alerts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unhealthy_alerts_once_without_retry() {
        let h = harness(Parser::Elasticsearch, vec![Ok(es(200, "red"))]);

        let report = h.monitor.run_tick(1).await.unwrap();

        assert_eq!(h.prober.calls(), 1);
        assert_eq!(report.outcome, TickOutcome::Unhealthy);
        assert_eq!(report.last_level, Some(HealthLevel::Unhealthy));
        assert_eq!(h.notifier.reasons(), vec![AlertReason::UnhealthyService]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_skips_parser_and_metrics() {
        let h = harness(
            Parser::Elasticsearch,
            vec![Err(TransportError::Timeout)],
        );

        let report = h.monitor.run_tick(1).await.unwrap();

        assert_eq!(h.prober.calls(), 1);
        assert_eq!(report.classified, 0);
        assert_eq!(report.outcome, TickOutcome::TransportFailure);
        let alerts = h.notifier.alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].reason, AlertReason::TransportFailure);
        assert!(alerts[0].error.as_deref().unwrap().contains("timed out"));
        assert_eq!(h.metrics.latency_observations(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_after_degradation_stops() {
        let h = harness(
            Parser::Elasticsearch,
            vec![Ok(es(200, "yellow")), Err(TransportError::Timeout)],
        );

        let report = h.monitor.run_tick(1).await.unwrap();

        assert_eq!(h.prober.calls(), 2);
        assert_eq!(report.backoff_secs, vec![2]);
        assert_eq!(h.notifier.reasons(), vec![AlertReason::TransportFailure]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bad_status_alerts_independently_of_body() {
        let h = harness(
            Parser::Default,
            vec![Ok(ProbeResponse {
                status: 503,
                body: Bytes::new(),
                elapsed: Duration::from_millis(5),
            })],
        );

        let report = h.monitor.run_tick(1).await.unwrap();

        // Default parser still says healthy; the status alert is separate.
        assert_eq!(report.outcome, TickOutcome::Healthy);
        assert_eq!(h.notifier.reasons(), vec![AlertReason::UnhealthyEndpoint]);
        assert_eq!(h.metrics.status_count("503"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bad_status_and_red_raise_two_alerts() {
        let h = harness(Parser::Elasticsearch, vec![Ok(es(500, "red"))]);

        h.monitor.run_tick(1).await.unwrap();

        assert_eq!(
            h.notifier.reasons(),
            vec![AlertReason::UnhealthyEndpoint, AlertReason::UnhealthyService]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_response_is_not_an_alert() {
        let mut slow = es(200, "green");
        slow.elapsed = Duration::from_secs(3);
        let h = harness(Parser::Elasticsearch, vec![Ok(slow)]);

        let report = h.monitor.run_tick(1).await.unwrap();

        assert_eq!(report.outcome, TickOutcome::Healthy);
        assert!(h.notifier.alerts().is_empty());
        assert_eq!(report.last_response_time_ms, Some(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unparseable_body_is_fatal() {
        let h = harness(
            Parser::Elasticsearch,
            vec![Ok(ProbeResponse {
                status: 200,
                body: Bytes::from_static(b"<html>maintenance</html>"),
                elapsed: Duration::from_millis(5),
            })],
        );

        let err = h.monitor.run_tick(1).await.unwrap_err();
        assert!(matches!(err, MonitorError::Parse(_)));
        assert_eq!(h.prober.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_ticks_until_shutdown() {
        let h = harness(Parser::Elasticsearch, vec![]);
        let board = StatusBoard::new();
        let monitor = h.monitor.with_status_board(board.clone());
        let shutdown = Shutdown::new();

        let handle = tokio::spawn(monitor.run(shutdown.subscribe()));

        // First tick at 5s, second at 10s.
        time::sleep(Duration::from_secs(11)).await;
        shutdown.trigger();

        handle.await.unwrap().unwrap();
        assert_eq!(h.prober.calls(), 2);
        assert_eq!(board.latest().unwrap().tick, 2);
        assert_eq!(h.metrics.status_count("200"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_long_tick_skips_missed_intervals() {
        // Tick 1 starts at 5s and backs off until 19s. The ticks due at 10s and 15s
        // collapse into a single tick at 19s; the schedule resumes at 20s.
        let script = (0..4).map(|_| Ok(es(200, "yellow"))).collect();
        let h = harness(Parser::Elasticsearch, script);
        let shutdown = Shutdown::new();

        let handle = tokio::spawn(h.monitor.run(shutdown.subscribe()));

        time::sleep(Duration::from_secs(21)).await;
        shutdown.trigger();
        handle.await.unwrap().unwrap();

        assert_eq!(h.prober.calls(), 6);
        assert_eq!(h.notifier.reasons(), vec![AlertReason::SustainedDegradation]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_waits_for_backoff_to_finish() {
        // Tick 1 starts at 5s; shutdown lands at 6s, inside the first 2s backoff.
        // The tick still runs all four attempts and returns at 19s.
        let script = (0..4).map(|_| Ok(es(200, "yellow"))).collect();
        let h = harness(Parser::Elasticsearch, script);
        let shutdown = Shutdown::new();
        let start = Instant::now();

        let handle = tokio::spawn(h.monitor.run(shutdown.subscribe()));

        time::sleep(Duration::from_secs(6)).await;
        assert_eq!(h.prober.calls(), 1);
        shutdown.trigger();
        handle.await.unwrap().unwrap();

        assert_eq!(h.prober.calls(), 4);
        assert_eq!(h.notifier.reasons(), vec![AlertReason::SustainedDegradation]);
        assert!(start.elapsed() >= Duration::from_secs(19));
        assert!(start.elapsed() < Duration::from_secs(20));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_surfaces_parse_error() {
        let h = harness(
            Parser::Elasticsearch,
            vec![Ok(ProbeResponse {
                status: 200,
                body: Bytes::from_static(b"not json"),
                elapsed: Duration::from_millis(5),
            })],
        );
        let shutdown = Shutdown::new();

        let result = h.monitor.run(shutdown.subscribe()).await;
        assert!(matches!(result, Err(MonitorError::Parse(_))));
    }
}
