//! Retrying transient store failures.
//!
//! History lookups are read-only and writes are gated by the sync decision,
//! so repeating either after an `Unavailable` error is safe. Every other
//! error is returned at once.

use std::thread;
use std::time::Duration;

use tracing::warn;

use crate::error::StoreError;
use crate::types::config::BackoffStrategy;

/// Upper bound on any single retry delay.
pub const MAX_DELAY_MS: u64 = 300_000;

// ---------------------------------------------------------------------------
// RetryPolicy
// ---------------------------------------------------------------------------

/// How many times a store operation may be retried and how long to wait
/// between attempts.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub strategy: BackoffStrategy,
    pub base_delay_ms: u64,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, strategy: BackoffStrategy, base_delay_ms: u64) -> Self {
        RetryPolicy {
            max_retries,
            strategy,
            base_delay_ms,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        RetryPolicy::new(0, BackoffStrategy::Fixed, 0)
    }

    /// Whether the given attempt number (0-indexed) is within the retry budget.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }

    /// Compute the delay in milliseconds before the given attempt, capped
    /// at `MAX_DELAY_MS`.
    ///
    /// Attempt 0 is the first retry (after the initial failure).
    pub fn delay_ms(&self, attempt: u32) -> u64 {
        let delay = match self.strategy {
            BackoffStrategy::Fixed => self.base_delay_ms,
            BackoffStrategy::Linear => self
                .base_delay_ms
                .saturating_mul(u64::from(attempt).saturating_add(1)),
            BackoffStrategy::Exponential => self
                .base_delay_ms
                .saturating_mul(2u64.saturating_pow(attempt)),
        };
        delay.min(MAX_DELAY_MS)
    }

    /// Run `op`, retrying transient failures within the budget.
    pub fn run<T, F>(&self, path: &str, mut op: F) -> Result<T, StoreError>
    where
        F: FnMut() -> Result<T, StoreError>,
    {
        let mut attempt = 0;
        loop {
            match op() {
                Err(err) if err.is_transient() && self.should_retry(attempt) => {
                    let delay = self.delay_ms(attempt);
                    warn!(
                        path,
                        attempt = attempt + 1,
                        delay_ms = delay,
                        error = %err,
                        "transient store error, retrying"
                    );
                    if delay > 0 {
                        thread::sleep(Duration::from_millis(delay));
                    }
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

impl Default for RetryPolicy {
    /// Default: no retries, matching a single-shot run.
    fn default() -> Self {
        RetryPolicy::none()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
