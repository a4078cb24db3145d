//! Shared HTTP plumbing for provider adapters.
//!
//! The `reqwest::Client` (and its connection pool) is created once at process
//! start and injected into every adapter. Each adapter wraps it in a
//! [`ProviderClient`] that owns the adapter's base URL, rate limiter and
//! retry policy.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::MarketDataError;
use crate::registry::{RateLimiter, RetryPolicy};

use super::capabilities::ProviderEndpoint;

/// User agent sent with every upstream request.
pub const USER_AGENT: &str = "TokenPulse-Aggregator/1.0";

/// Per-adapter HTTP client.
pub struct ProviderClient {
    provider: &'static str,
    client: Client,
    endpoint: ProviderEndpoint,
    rate_limiter: RateLimiter,
}

impl ProviderClient {
    pub fn new(provider: &'static str, client: Client, endpoint: ProviderEndpoint) -> Self {
        let rate_limiter = RateLimiter::new(provider, endpoint.rate_limit.requests_per_minute);
        Self {
            provider,
            client,
            endpoint,
            rate_limiter,
        }
    }

    pub fn endpoint(&self) -> &ProviderEndpoint {
        &self.endpoint
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.endpoint.retry
    }

    /// GET `path` relative to the base URL and decode the JSON body.
    ///
    /// Waits on the rate limiter once, then runs the request under the
    /// retry policy.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, MarketDataError> {
        self.rate_limiter.acquire().await;

        let label = format!("{} {}", self.provider, path);
        self.endpoint
            .retry
            .run(&label, || self.send_once::<T>(path, params))
            .await
    }

    async fn send_once<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, MarketDataError> {
        let url = format!("{}{}", self.endpoint.base_url, path);

        debug!(
            "{} request: {} with {} params",
            self.provider,
            path,
            params.len()
        );

        let response = self
            .client
            .get(&url)
            .query(params)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.endpoint.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MarketDataError::Timeout {
                        provider: self.provider.to_string(),
                    }
                } else {
                    MarketDataError::Network(e)
                }
            })?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: self.provider.to_string(),
            });
        }

        if status.is_client_error() {
            return Err(MarketDataError::ClientError {
                provider: self.provider.to_string(),
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MarketDataError::ProviderError {
                provider: self.provider.to_string(),
                message: format!("HTTP {} - {}", status, truncate(&body, 200)),
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout {
                    provider: self.provider.to_string(),
                }
            } else {
                MarketDataError::Network(e)
            }
        })?;

        decode(self.provider, &body)
    }
}

/// Decode a JSON body, mapping failures to [`MarketDataError::Decode`].
pub(crate) fn decode<T: DeserializeOwned>(provider: &str, body: &str) -> Result<T, MarketDataError> {
    serde_json::from_str(body).map_err(|e| MarketDataError::Decode {
        provider: provider.to_string(),
        message: e.to_string(),
    })
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
