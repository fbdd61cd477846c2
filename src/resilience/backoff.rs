//! Exponential backoff between degraded probe attempts.

use std::time::Duration;

/// Delay to wait after the given attempt before probing again.
///
/// `2^attempt` seconds, saturating at `u64::MAX` seconds.
pub fn next_delay(attempt: u32) -> Duration {
    Duration::from_secs(2u64.saturating_pow(attempt))
}
