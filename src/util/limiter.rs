//! Token bucket rate limiting.

use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::trace;

#[derive(Debug, Error)]
pub enum LimiterError {
    #[error("rate must be positive and finite, got {0}")]
    InvalidRate(f64),

    #[error("burst must be at least 1")]
    InvalidBurst,
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Token bucket limiter shared by concurrent workers.
///
/// Holds up to `burst` tokens, refilled at `rate` tokens per second. The
/// bucket starts full.
#[derive(Debug)]
pub struct RateLimiter {
    rate: f64,
    burst: u32,
    bucket: Mutex<Bucket>,
}

impl RateLimiter {
    pub fn new(rate: f64, burst: u32) -> Result<Self, LimiterError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(LimiterError::InvalidRate(rate));
        }
        if burst == 0 {
            return Err(LimiterError::InvalidBurst);
        }

        Ok(Self {
            rate,
            burst,
            bucket: Mutex::new(Bucket {
                tokens: burst as f64,
                last_refill: Instant::now(),
            }),
        })
    }

    /// Takes a token if one is available right now.
    pub async fn try_acquire(&self) -> bool {
        let mut bucket = self.bucket.lock().await;
        self.refill(&mut bucket);

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Waits until a token is available and takes it.
    ///
    /// Returns the total time spent waiting. The lock is never held across
    /// the sleep.
    pub async fn wait(&self) -> Duration {
        let mut total_wait = Duration::ZERO;

        loop {
            let wait_duration = {
                let mut bucket = self.bucket.lock().await;
                self.refill(&mut bucket);

                if bucket.tokens >= 1.0 {
                    bucket.tokens -= 1.0;
                    return total_wait;
                }

                Duration::from_secs_f64((1.0 - bucket.tokens) / self.rate)
            };

            trace!(wait = ?wait_duration, "rate limited");
            tokio::time::sleep(wait_duration).await;
            total_wait += wait_duration;
        }
    }

    fn refill(&self, bucket: &mut Bucket) {
        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last_refill);

        bucket.tokens = (bucket.tokens + elapsed.as_secs_f64() * self.rate).min(self.burst as f64);
        bucket.last_refill = now;
    }
}
