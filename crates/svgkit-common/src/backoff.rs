//! Poll backoff policy.
//!
//! The fallback engine re-runs its document pass until the host document
//! reports the `complete` ready state. Early passes should be frequent (the
//! first images appear while the parser is still running), later passes can
//! slow down. This module computes the delay between passes.

use std::time::Duration;

/// Backoff configuration for repeated document passes.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffConfig {
    /// Delay before the second pass (the first pass runs immediately).
    pub initial_delay: Duration,
    /// Upper bound for the delay between passes.
    pub max_delay: Duration,
    /// Backoff multiplier (1.0 = fixed interval, 2.0 = exponential).
    pub multiplier: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(250),
            multiplier: 2.0,
        }
    }
}

impl BackoffConfig {
    /// Create a fixed-interval config.
    pub fn fixed(interval: Duration) -> Self {
        Self {
            initial_delay: interval,
            max_delay: interval,
            multiplier: 1.0,
        }
    }

    /// Calculate the delay after a given pass (1-indexed).
    pub fn delay_after_pass(&self, pass: u32) -> Duration {
        if pass == 0 {
            return Duration::ZERO;
        }

        let base = self.initial_delay.as_secs_f64() * self.multiplier.powi((pass - 1) as i32);
        Duration::from_secs_f64(base.min(self.max_delay.as_secs_f64()))
    }
}
