//! Provider rate limiting and endpoint configuration.

use std::time::Duration;

use crate::registry::RetryPolicy;

/// Default upstream request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Rate limiting configuration for a provider.
///
/// Controls how aggressively we can call a provider to avoid
/// hitting their rate limits and getting blocked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimit {
    /// Maximum requests allowed per minute.
    pub requests_per_minute: u32,
}

impl RateLimit {
    pub fn per_minute(requests_per_minute: u32) -> Self {
        Self {
            requests_per_minute,
        }
    }
}

impl Default for RateLimit {
    fn default() -> Self {
        Self::per_minute(60)
    }
}

/// Where and how an adapter talks to its upstream.
#[derive(Clone, Debug)]
pub struct ProviderEndpoint {
    /// Base URL, without trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Request budget.
    pub rate_limit: RateLimit,
    /// Retry policy for transient failures.
    pub retry: RetryPolicy,
}

impl ProviderEndpoint {
    pub fn new(base_url: impl Into<String>, requests_per_minute: u32) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            rate_limit: RateLimit::per_minute(requests_per_minute),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
