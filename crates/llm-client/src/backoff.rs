//! Exponential backoff for rate-limited requests.
//!
//! Only [`ClientError::RateLimited`] is retried. Delays grow as
//! `initial * factor^attempt` with full jitter, and the loop gives up once the
//! total time budget is spent, returning the last rate-limit error.

use crate::error::ClientError;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffPolicy {
    /// Delay ceiling before the first retry
    pub initial: Duration,
    /// Growth factor between attempts
    pub factor: f64,
    /// Total time budget across all attempts
    pub max_elapsed: Duration,
    /// Sleep a random fraction of the ceiling instead of the full ceiling
    pub jitter: bool,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(1),
            factor: 2.0,
            max_elapsed: Duration::from_secs(600),
            jitter: true,
        }
    }
}

impl BackoffPolicy {
    /// Delay ceiling for the given zero-based retry attempt
    pub fn ceiling(&self, attempt: u32) -> Duration {
        let exp = self.factor.powi(attempt.min(63) as i32);
        let secs = self.initial.as_secs_f64() * exp;
        if secs.is_finite() && secs < self.max_elapsed.as_secs_f64() {
            Duration::from_secs_f64(secs)
        } else {
            self.max_elapsed
        }
    }

    fn delay(&self, attempt: u32) -> Duration {
        let ceiling = self.ceiling(attempt);
        if !self.jitter || ceiling.is_zero() {
            return ceiling;
        }
        let millis = ceiling.as_millis().min(u64::MAX as u128) as u64;
        Duration::from_millis(rand::random_range(0..=millis))
    }
}

/// Run `op` until it succeeds, fails with a non rate-limit error, or the
/// policy's time budget runs out.
pub async fn retry_on_rate_limit<T, F, Fut>(policy: &BackoffPolicy, mut op: F) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let start = Instant::now();
    let mut attempt: u32 = 0;

    loop {
        match op().await {
            Err(e) if e.is_rate_limit() => {
                let elapsed = start.elapsed();
                if elapsed >= policy.max_elapsed {
                    warn!(
                        "Giving up after {} attempts over {:.1?}: {}",
                        attempt + 1,
                        elapsed,
                        e
                    );
                    return Err(e);
                }

                let remaining = policy.max_elapsed - elapsed;
                let delay = policy.delay(attempt).min(remaining);
                debug!("Rate limited (attempt {}), retrying in {:?}", attempt + 1, delay);
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            other => return other,
        }
    }
}
