//! Asset provider trait definitions.
//!
//! This module defines the core `AssetProvider` trait that every upstream
//! adapter implements.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{AssetRecord, ProviderResult};

use super::capabilities::RateLimit;

/// Trait for upstream asset metadata providers.
///
/// Implement this trait to add support for a new data source. Adapters
/// implement the fallible `*_assets` methods; callers use [`fetch`] and
/// [`search`], which never fail and fold errors into a [`ProviderResult`].
///
/// [`fetch`]: AssetProvider::fetch
/// [`search`]: AssetProvider::search
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use tokenpulse_market_data::provider::{AssetProvider, RateLimit};
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl AssetProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "my_provider"
///     }
///
///     fn rate_limit(&self) -> RateLimit {
///         RateLimit::per_minute(120)
///     }
///
///     async fn fetch_assets(&self, limit: usize) -> Result<Vec<AssetRecord>, MarketDataError> {
///         // ... call upstream, transform
///     }
/// }
/// ```
#[async_trait]
pub trait AssetProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Used for logging and as the provenance label on produced records.
    fn id(&self) -> &'static str;

    /// Rate limiting budget for this provider.
    fn rate_limit(&self) -> RateLimit;

    /// Fetch up to `limit` currently interesting assets.
    async fn fetch_assets(&self, limit: usize) -> Result<Vec<AssetRecord>, MarketDataError>;

    /// Search the upstream for assets matching `query`.
    ///
    /// Default implementation returns `NotSupported`.
    async fn search_assets(&self, query: &str) -> Result<Vec<AssetRecord>, MarketDataError> {
        let _ = query;
        Err(MarketDataError::NotSupported {
            operation: "search".to_string(),
            provider: self.id().to_string(),
        })
    }

    /// Fetch assets, folding any failure into an unsuccessful result.
    async fn fetch(&self, limit: usize) -> ProviderResult {
        ProviderResult::from_outcome(self.id(), self.fetch_assets(limit).await)
    }

    /// Search assets, folding any failure into an unsuccessful result.
    async fn search(&self, query: &str) -> ProviderResult {
        ProviderResult::from_outcome(self.id(), self.search_assets(query).await)
    }
}
