//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Health monitor produces:
//!     → logging.rs (structured log events, per-tick spans)
//!     → metrics.rs (latency histogram, status and alert counters)
//!
//! Consumers:
//!     → Log aggregation (stdout, JSON lines)
//!     → Metrics endpoint (Prometheus scrape via the status server)
//! ```

pub mod logging;
pub mod metrics;
