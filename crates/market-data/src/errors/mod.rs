//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all upstream provider operations
//! - [`RetryClass`]: Classification for determining retry behavior

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur while talking to an upstream provider.
///
/// These never leave the adapter boundary as errors: the registry turns them
/// into a failed [`ProviderResult`](crate::models::ProviderResult).
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The provider answered with a server-side error (5xx).
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider rejected the request (4xx other than 429).
    #[error("Client error: {provider} - HTTP {status}")]
    ClientError {
        /// The provider that rejected the request
        provider: String,
        /// HTTP status code
        status: u16,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("Decode error: {provider} - {message}")]
    Decode {
        /// The provider whose payload failed to decode
        provider: String,
        /// Decoder message
        message: String,
    },

    /// The provider does not offer this operation.
    #[error("Operation '{operation}' not supported by {provider}")]
    NotSupported {
        /// The unsupported operation
        operation: String,
        /// The provider
        provider: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Returns the retry classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use tokenpulse_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::RateLimited { provider: "dexscreener".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    ///
    /// let error = MarketDataError::ClientError { provider: "jupiter".to_string(), status: 404 };
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::ClientError { .. } | Self::NotSupported { .. } => RetryClass::Never,

            Self::RateLimited { .. }
            | Self::Timeout { .. }
            | Self::ProviderError { .. }
            | Self::Decode { .. }
            | Self::Network(_) => RetryClass::WithBackoff,
        }
    }
}
