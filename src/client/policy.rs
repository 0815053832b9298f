use crate::Error;
use std::time::Duration;

/// Decision for how to proceed after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Retry { delay: Duration },
    Fail,
}

/// Retry policy: bounded attempts with exponential backoff.
///
/// Deterministic on purpose (no jitter) so worst-case latency is exactly
/// `timeout * (max_retries + 1) + sum(backoff delays)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Delay before the `retry`-th retry (1-based): `base * 2^(retry-1)`.
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let exp = retry.saturating_sub(1);
        let factor = 1u32.checked_shl(exp).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Decide what to do after attempt number `attempt` (1-based) failed.
    pub fn decide(&self, err: &Error, attempt: u32) -> Decision {
        if err.is_retryable() && attempt <= self.max_retries {
            Decision::Retry {
                delay: self.backoff_delay(attempt),
            }
        } else {
            Decision::Fail
        }
    }

    /// Upper bound on the total wall time of one call.
    pub fn worst_case_latency(&self, timeout: Duration) -> Duration {
        let attempts = timeout.saturating_mul(self.max_retries.saturating_add(1));
        (1..=self.max_retries)
            .map(|k| self.backoff_delay(k))
            .fold(attempts, Duration::saturating_add)
    }
}
