//! Retry policy for per-target acquisition attempts.
//!
//! Every attempt failure is treated the same way — timeouts and unexpected
//! conditions alike — so the policy only has to answer "how many attempts"
//! and "how long to sleep after attempt N".

use std::time::Duration;

/// Linear-backoff retry policy.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Extra attempts after the first.
    pub retry_count: u32,
    /// Sleep after the first failed attempt.
    pub base_delay: Duration,
    /// Added per subsequent attempt.
    pub step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_count: 2,
            base_delay: Duration::from_secs(1),
            step: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Total attempts a target gets, including the first.
    pub fn attempt_budget(&self) -> u32 {
        self.retry_count + 1
    }

    /// Backoff after the given 1-based attempt number.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay + self.step.saturating_mul(attempt)
    }
}
