//! Retry execution with exponential backoff.
//!
//! Only errors classified as transient by [`crate::error::is_transient`]
//! are retried; anything else surfaces on the first occurrence.

use std::future::Future;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{PoolError, PoolResult};

/// Ceiling on any single backoff delay.
pub const MAX_BACKOFF: Duration = Duration::from_secs(5);

/// Executes operations with exponential backoff on transient errors.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Delay before the retry that follows `attempt` (zero-based):
    /// `base_delay * 2^attempt`, capped at [`MAX_BACKOFF`].
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(MAX_BACKOFF)
    }

    /// Run `operation` until it succeeds, fails fatally, or the retry
    /// budget is exhausted.
    ///
    /// The operation is invoked at most `max_retries + 1` times and sleeps
    /// happen only between attempts. Cancelling `cancel` aborts a pending
    /// backoff sleep and returns [`PoolError::Cancelled`] instead of the
    /// last operation error.
    pub async fn run<T, F, Fut>(
        &self,
        cancel: &CancellationToken,
        op_name: &str,
        mut operation: F,
    ) -> PoolResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = PoolResult<T>>,
    {
        let started = Instant::now();
        let mut attempt: u32 = 0;
        loop {
            let err = match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !err.is_retryable() {
                debug!(op = op_name, error = %err, "fatal error, not retrying");
                return Err(err);
            }

            if attempt >= self.max_retries {
                let attempts = attempt + 1;
                let elapsed = started.elapsed();
                warn!(
                    op = op_name,
                    attempts,
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %err,
                    "retry budget exhausted"
                );
                return Err(PoolError::retries_exhausted(op_name, attempts, elapsed, err));
            }

            if cancel.is_cancelled() {
                return Err(PoolError::Cancelled);
            }

            let delay = self.backoff_delay(attempt);
            debug!(
                op = op_name,
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "transient error, retrying after backoff"
            );
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = cancel.cancelled() => return Err(PoolError::Cancelled),
            }

            attempt += 1;
        }
    }
}
