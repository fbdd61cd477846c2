//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment
//!     → loader.rs (read variables, parse durations)
//!     → validation.rs (semantic checks)
//!     → HealthCheckConfig (validated, immutable)
//!     → cloned into the monitor and the status server
//! ```
//!
//! # Design Decisions
//! - Config is loaded once at startup; there is no reload
//! - An unknown PARSER is a warning, every other bad value is fatal
//! - The loader takes a lookup function so tests never touch the real environment

pub mod duration;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from, ConfigError};
pub use schema::HealthCheckConfig;
