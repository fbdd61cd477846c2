//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Active health checks (monitor.rs):
//!     Periodic timer
//!     → Probe the endpoint (probe.rs)
//!     → Parse the body (crate::parsing)
//!     → Retry / alert (crate::resilience, crate::alert)
//!     → Publish TickReport (report.rs)
//! ```
//!
//! # Design Decisions
//! - One endpoint, one monitor task
//! - HTTP status and parsed body are independent signals
//! - Transport failures end the tick without retrying

pub mod monitor;
pub mod probe;
pub mod report;

pub use monitor::{HealthMonitor, MonitorError};
pub use probe::{HttpProber, Probe, ProbeResponse, TransportError};
pub use report::{StatusBoard, TickOutcome, TickReport};
