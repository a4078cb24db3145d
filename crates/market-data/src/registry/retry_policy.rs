//! Bounded exponential-backoff retry for upstream requests.

use std::future::Future;
use std::time::Duration;

use log::{error, warn};

use crate::errors::{MarketDataError, RetryClass};

/// Default number of retries after the first attempt.
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay before the first retry.
const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);

/// Default upper bound for a single backoff delay.
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(10);

/// Default multiplier applied to the delay after each failed attempt.
const DEFAULT_BACKOFF_FACTOR: u32 = 2;

/// Retry configuration for a provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (total attempts = max_retries + 1).
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Cap for any single delay.
    pub max_delay: Duration,
    /// Delay multiplier.
    pub backoff_factor: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: DEFAULT_INITIAL_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
        }
    }
}

impl RetryPolicy {
    /// A policy that performs exactly one attempt.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay to wait after the failed attempt number `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.backoff_factor.max(1).saturating_pow(attempt);
        self.initial_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error, or
    /// the retry budget is spent. The last error is returned unchanged.
    pub async fn run<T, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, MarketDataError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, MarketDataError>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if e.retry_class() == RetryClass::Never => return Err(e),
                Err(e) if attempt >= self.max_retries => {
                    error!(
                        "{}: max retries ({}) exceeded: {}",
                        label, self.max_retries, e
                    );
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        "{}: attempt {} failed, retrying in {:?}: {}",
                        label,
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    fn timeout() -> MarketDataError {
        MarketDataError::Timeout {
            provider: "test".to_string(),
        }
    }

    #[test]
    fn test_delay_doubles_up_to_cap() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for(3), Duration::from_secs(8));
        assert_eq!(policy.delay_for(4), Duration::from_secs(10));
        assert_eq!(policy.delay_for(40), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let result = RetryPolicy::default()
            .run("test", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(timeout())
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 1s + 2s of backoff
        assert!(start.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_return_last_error() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = RetryPolicy::default()
            .run("test", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(timeout()) }
            })
            .await;

        assert!(matches!(result, Err(MarketDataError::Timeout { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_class_is_not_retried() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = RetryPolicy::default()
            .run("test", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(MarketDataError::ClientError {
                        provider: "test".to_string(),
                        status: 404,
                    })
                }
            })
            .await;

        assert!(matches!(result, Err(MarketDataError::ClientError { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_retry_policy_makes_single_attempt() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = RetryPolicy::no_retry()
            .run("test", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(timeout()) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
