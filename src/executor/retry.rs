//! Retry policy
//!
//! Exponential backoff without jitter: the delay before the retry that
//! follows attempt `i` (0-based) is `2^i` backoff units.

use crate::config::{ClientConfig, RetryMode};
use crate::error::ClientError;
use std::time::Duration;

/// Attempt budget, backoff unit and failure classification for one client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum attempts including the first request
    pub max_attempts: u32,
    /// Delay before the first retry; later retries double it
    pub backoff_unit: Duration,
    /// Which failures are retried
    pub mode: RetryMode,
}

impl RetryPolicy {
    /// Build the policy described by a client configuration
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            max_attempts: config.retry_attempts().max(1),
            backoff_unit: config.backoff_unit(),
            mode: config.retry_mode(),
        }
    }

    /// Delay to wait after attempt `attempt_index` (0-based) has failed
    pub fn backoff_delay(&self, attempt_index: u32) -> Duration {
        let multiplier = 1u32.checked_shl(attempt_index).unwrap_or(u32::MAX);
        self.backoff_unit
            .checked_mul(multiplier)
            .unwrap_or(Duration::MAX)
    }

    /// Whether the failure of attempt `attempt_index` (0-based) should be
    /// followed by another attempt
    pub fn should_retry(&self, attempt_index: u32, error: &ClientError) -> bool {
        if attempt_index + 1 >= self.max_attempts || !error.is_attempt_failure() {
            return false;
        }
        match self.mode {
            RetryMode::Uniform => true,
            RetryMode::TransientOnly => error.is_transient(),
        }
    }

    /// Every delay an always-failing operation would wait, in order
    pub fn schedule(&self) -> Vec<Duration> {
        (0..self.max_attempts.saturating_sub(1))
            .map(|i| self.backoff_delay(i))
            .collect()
    }
}
