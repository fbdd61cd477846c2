//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → prober → status server → monitor
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     latched trigger → monitor returns at its next loop top
//!               → status server stops accepting
//!     main decides the exit code
//! ```
//!
//! # Design Decisions
//! - Workers never exit the process themselves
//! - No drain: an in-flight tick (including its backoff sleep) finishes first

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownSignal};
