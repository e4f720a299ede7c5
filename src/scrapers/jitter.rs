use std::ops::Range;
use std::time::Duration;
use tracing::debug;

/// Random pause before each outbound request to spread load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JitterDelay {
    range_ms: Range<u64>,
}

impl Default for JitterDelay {
    fn default() -> Self {
        Self { range_ms: 1000..3000 }
    }
}

impl JitterDelay {
    pub fn new(range_ms: Range<u64>) -> Self {
        Self { range_ms }
    }

    /// No pause at all
    pub fn none() -> Self {
        Self { range_ms: 0..0 }
    }

    /// Pick a duration uniformly from the configured range
    pub fn sample(&self) -> Duration {
        if self.range_ms.is_empty() {
            return Duration::ZERO;
        }
        Duration::from_millis(fastrand::u64(self.range_ms.clone()))
    }

    pub async fn wait(&self) {
        let pause = self.sample();
        if pause.is_zero() {
            return;
        }
        debug!(pause_ms = pause.as_millis() as u64, "Jitter delay");
        tokio::time::sleep(pause).await;
    }
}
