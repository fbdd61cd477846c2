//! Endpoint health checker library.

pub mod admin;
pub mod alert;
pub mod config;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod parsing;
pub mod resilience;

pub use config::HealthCheckConfig;
pub use health::HealthMonitor;
pub use lifecycle::Shutdown;
