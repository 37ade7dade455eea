// Client-side throttle for Cloud Vision calls.
//
// Vision quotas are per project and per minute, and a batch fans out every
// selected post at once. When CORDOBA_VISION_QPS is set, the Google client
// spaces its annotate calls at least 1/qps seconds apart. Requests that
// arrive early sleep until their slot opens.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Enforces a minimum interval between consecutive requests.
#[derive(Clone)]
pub struct RateLimiter {
    interval: Duration,
    /// The instant the most recent request was scheduled for.
    next_slot: Arc<Mutex<Option<Instant>>>,
}

impl RateLimiter {
    /// Allow at most `requests_per_second` calls per second.
    pub fn new(requests_per_second: f64) -> Result<Self> {
        if !requests_per_second.is_finite() || requests_per_second <= 0.0 {
            anyhow::bail!("Rate limit must be a positive number, got {requests_per_second}");
        }
        let interval = Duration::try_from_secs_f64(1.0 / requests_per_second)
            .with_context(|| format!("Rate limit {requests_per_second} is too small"))?;
        Ok(Self {
            interval,
            next_slot: Arc::new(Mutex::new(None)),
        })
    }

    /// Wait for this caller's slot.
    ///
    /// Slots are reserved under the lock and slept on outside it, so
    /// concurrent callers queue up one interval apart instead of all
    /// waking at once.
    pub async fn acquire(&self) {
        let wait_until = {
            let mut slot = self.next_slot.lock().await;
            let now = Instant::now();
            let scheduled = match *slot {
                Some(previous) if previous + self.interval > now => previous + self.interval,
                _ => now,
            };
            *slot = Some(scheduled);
            scheduled
        };

        tokio::time::sleep_until(wait_until).await;
    }
}
