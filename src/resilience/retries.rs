//! Per-tick retry state.
//!
//! # Responsibilities
//! - Track the attempt number within one tick
//! - Decide, from a health level, whether to stop, alert, or back off and retry
//!
//! # Design Decisions
//! - Only `Degraded` is retried; `Unhealthy` alerts straight away
//! - Transport failures never reach this table, the monitor stops on them directly
//! - A fresh state is built for every tick and dropped when the tick ends

use std::time::Duration;

use crate::parsing::HealthLevel;
use crate::resilience::backoff::next_delay;

/// Retry ceiling for one tick.
pub const MAX_ATTEMPTS: u32 = 4;

/// What the monitor should do after classifying an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Service is healthy; the tick ends quietly.
    Done,
    /// Service is degraded and budget remains; sleep then probe again.
    Backoff(Duration),
    /// Degraded on the last permitted attempt.
    SustainedDegradation,
    /// Service reported itself unhealthy.
    Unhealthy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryState {
    attempt: u32,
    max_attempts: u32,
    should_continue: bool,
}

impl RetryState {
    pub fn new() -> Self {
        Self::with_max_attempts(MAX_ATTEMPTS)
    }

    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            attempt: 1,
            max_attempts: max_attempts.max(1),
            should_continue: true,
        }
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn should_continue(&self) -> bool {
        self.should_continue
    }

    /// Stop without consuming an attempt (transport failure).
    pub fn stop(&mut self) {
        self.should_continue = false;
    }

    /// Apply the transition table for the level observed on the current attempt.
    ///
    /// On `Backoff` the attempt counter has already been advanced; the caller
    /// only needs to sleep for the returned delay.
    pub fn advance(&mut self, level: HealthLevel) -> RetryDecision {
        match level {
            HealthLevel::Healthy => {
                self.should_continue = false;
                RetryDecision::Done
            }
            HealthLevel::Degraded if self.attempt >= self.max_attempts => {
                self.should_continue = false;
                RetryDecision::SustainedDegradation
            }
            HealthLevel::Degraded => {
                let delay = next_delay(self.attempt);
                self.attempt += 1;
                RetryDecision::Backoff(delay)
            }
            HealthLevel::Unhealthy => {
                self.should_continue = false;
                RetryDecision::Unhealthy
            }
        }
    }
}

impl Default for RetryState {
    fn default() -> Self {
        Self::new()
    }
}
