//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Health level from one probe attempt:
//!     → retries.rs (transition table, attempt counter)
//!     → On degradation: backoff.rs (delay before the next attempt)
//! ```
//!
//! # Design Decisions
//! - Retry budget is per tick, never carried between ticks
//! - Backoff is deterministic (no jitter)

pub mod backoff;
pub mod retries;
