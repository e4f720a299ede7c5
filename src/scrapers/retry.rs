use crate::error::ExtractError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Exponential backoff for rate-limited extraction calls.
///
/// Only [`ExtractError::RateLimited`] is retried; every other failure is
/// returned straight away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(2000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), base_delay }
    }

    /// Wait before the retry that follows attempt `attempt` (0-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.min(31));
        self.base_delay.saturating_mul(factor)
    }

    /// Run `op` until it succeeds, fails with a non-rate-limit error, or
    /// runs out of attempts. The last error is returned on exhaustion.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, ExtractError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ExtractError>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_rate_limited() && attempt + 1 < self.max_attempts => {
                    let wait = self.delay_for(attempt);
                    warn!(
                        wait_ms = wait.as_millis() as u64,
                        retry = attempt + 1,
                        max_attempts = self.max_attempts,
                        "Rate limited, backing off"
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
