//! Minimum-interval rate limiter for a single provider.
//!
//! Each adapter owns one limiter derived from its requests-per-minute budget.
//! Before a request the caller waits until `60s / rpm` has passed since the
//! previous request issued through the same limiter. Limiters are never
//! shared between providers.

use std::time::Duration;

use log::debug;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Default rate limit: 60 requests per minute.
const DEFAULT_REQUESTS_PER_MINUTE: u32 = 60;

/// Per-instance rate limiter enforcing a minimum gap between requests.
#[derive(Debug)]
pub struct RateLimiter {
    /// Label used in log lines.
    provider: String,
    /// Minimum interval between two requests.
    min_interval: Duration,
    /// When the last request was let through.
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter for `requests_per_minute`. A budget of zero is
    /// treated as the default budget.
    pub fn new(provider: impl Into<String>, requests_per_minute: u32) -> Self {
        let rpm = if requests_per_minute == 0 {
            DEFAULT_REQUESTS_PER_MINUTE
        } else {
            requests_per_minute
        };

        Self {
            provider: provider.into(),
            min_interval: Duration::from_secs(60) / rpm,
            last_request: Mutex::new(None),
        }
    }

    /// The enforced gap between two requests.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until the minimum interval since the previous request has elapsed,
    /// then record the current instant as the new last request.
    ///
    /// Concurrent callers on the same limiter are serialized, so each of them
    /// observes the interval relative to the one before it.
    pub async fn acquire(&self) {
        let mut last_request = self.last_request.lock().await;

        if let Some(last) = *last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                debug!(
                    "Rate limiter: waiting {:?} for provider '{}'",
                    wait_time, self.provider
                );
                tokio::time::sleep(wait_time).await;
            }
        }

        *last_request = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_derived_from_budget() {
        let limiter = RateLimiter::new("dexscreener", 300);
        assert_eq!(limiter.min_interval(), Duration::from_millis(200));

        let limiter = RateLimiter::new("jupiter", 600);
        assert_eq!(limiter.min_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_zero_budget_falls_back_to_default() {
        let limiter = RateLimiter::new("test", 0);
        assert_eq!(limiter.min_interval(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_request_is_immediate() {
        let limiter = RateLimiter::new("test", 60);
        let start = Instant::now();
        limiter.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_request_waits_for_interval() {
        let limiter = RateLimiter::new("test", 60);
        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_once_interval_has_passed() {
        let limiter = RateLimiter::new("test", 60);
        limiter.acquire().await;
        tokio::time::sleep(Duration::from_secs(2)).await;

        let start = Instant::now();
        limiter.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_limiters_are_independent() {
        let a = RateLimiter::new("a", 60);
        let b = RateLimiter::new("b", 60);
        a.acquire().await;

        let start = Instant::now();
        b.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
