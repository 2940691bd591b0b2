//! Token bucket bounding outbound poll frequency.

use std::time::Duration;
use thiserror::Error;
use tokio::time::{sleep, Instant};

/// Returned when the bucket can never produce another token.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RateLimitError {
    #[error("rate limiter starved (rate {rate}/s, burst {burst})")]
    Starved { rate: f64, burst: f64 },
}

/// A token bucket owned by a single poll loop.
///
/// Starts full, refills continuously at `rate` tokens per second and never banks
/// more than `burst` tokens.
#[derive(Debug)]
pub struct RateLimiter {
    rate: f64,
    burst: f64,
    tokens: f64,
    last_update: Instant,
}

impl RateLimiter {
    pub fn new(rate: f64, burst: u32) -> Self {
        let burst = f64::from(burst);
        Self {
            rate,
            burst,
            tokens: burst,
            last_update: Instant::now(),
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();

        if self.rate.is_finite() && self.rate > 0.0 {
            self.tokens = (self.tokens + elapsed * self.rate).min(self.burst);
        }
        self.last_update = now;
    }

    /// Take a token if one is available right now.
    pub fn try_acquire(&mut self) -> bool {
        self.refill();
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Wait until a token is available and take it.
    pub async fn acquire(&mut self) -> Result<(), RateLimitError> {
        loop {
            if self.try_acquire() {
                return Ok(());
            }

            let deficit = 1.0 - self.tokens;
            let wait = (self.burst >= 1.0 && self.rate.is_finite() && self.rate > 0.0)
                .then(|| Duration::try_from_secs_f64(deficit / self.rate).ok())
                .flatten()
                .ok_or(RateLimitError::Starved {
                    rate: self.rate,
                    burst: self.burst,
                })?;

            sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_burst_then_refill() {
        let mut limiter = RateLimiter::new(0.1, 2);
        let start = Instant::now();

        // Burst is granted immediately
        limiter.acquire().await.unwrap();
        limiter.acquire().await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);

        // Third token takes one refill period
        limiter.acquire().await.unwrap();
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(10), "waited {:?}", elapsed);
        assert!(elapsed < Duration::from_secs(11), "waited {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_banks_more_than_burst() {
        let mut limiter = RateLimiter::new(1.0, 2);
        tokio::time::advance(Duration::from_secs(60)).await;

        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }

    #[tokio::test]
    async fn test_zero_rate_starves() {
        let mut limiter = RateLimiter::new(0.0, 1);
        limiter.acquire().await.unwrap();
        assert!(matches!(
            limiter.acquire().await,
            Err(RateLimitError::Starved { .. })
        ));
    }

    #[tokio::test]
    async fn test_zero_burst_starves() {
        let mut limiter = RateLimiter::new(5.0, 0);
        assert!(limiter.acquire().await.is_err());
    }
}
