//! Provider registry for fanning requests out to every adapter.
//!
//! The registry owns the ordered adapter list and:
//! - Calls every provider concurrently and waits for all of them
//! - Returns results in registration order, regardless of completion order
//! - Validates records before they leave the registry

use std::sync::Arc;

use futures::future::join_all;
use log::{debug, warn};

use super::AssetValidator;
use crate::models::{AssetRecord, ProviderResult};
use crate::provider::AssetProvider;

/// Ordered collection of providers.
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn AssetProvider>>,
    validator: AssetValidator,
}

impl ProviderRegistry {
    /// Create a registry. Provider order is significant: it fixes which
    /// source wins "first non-zero" conflicts during merge.
    pub fn new(providers: Vec<Arc<dyn AssetProvider>>) -> Self {
        Self::with_validator(providers, AssetValidator::new())
    }

    pub fn with_validator(providers: Vec<Arc<dyn AssetProvider>>, validator: AssetValidator) -> Self {
        Self {
            providers,
            validator,
        }
    }

    /// Provider ids in registration order.
    pub fn provider_ids(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Fetch from every provider concurrently.
    ///
    /// Waits for all providers (full join). A failing provider shows up as
    /// an unsuccessful [`ProviderResult`] and never affects the others.
    pub async fn fetch_all(&self, limit: usize) -> Vec<ProviderResult> {
        debug!(
            "Fetching up to {} assets from {} providers",
            limit,
            self.providers.len()
        );

        let results = join_all(self.providers.iter().map(|p| p.fetch(limit))).await;
        self.finish(results)
    }

    /// Search every provider concurrently. Same join semantics as [`fetch_all`].
    ///
    /// [`fetch_all`]: ProviderRegistry::fetch_all
    pub async fn search_all(&self, query: &str) -> Vec<ProviderResult> {
        debug!(
            "Searching '{}' across {} providers",
            query,
            self.providers.len()
        );

        let results = join_all(self.providers.iter().map(|p| p.search(query))).await;
        self.finish(results)
    }

    /// Flatten successful contributions in provider order.
    pub fn contributions(results: Vec<ProviderResult>) -> Vec<AssetRecord> {
        results
            .into_iter()
            .flat_map(ProviderResult::into_contribution)
            .collect()
    }

    fn finish(&self, results: Vec<ProviderResult>) -> Vec<ProviderResult> {
        results
            .into_iter()
            .map(|mut result| {
                if result.success {
                    let records = std::mem::take(&mut result.records);
                    result.records = self.validator.validate_all(&result.provider, records);
                } else {
                    warn!(
                        "Provider '{}' failed, contributing no records: {}",
                        result.provider,
                        result.error.as_deref().unwrap_or("unknown error")
                    );
                }
                result
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MarketDataError;
    use crate::provider::RateLimit;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct MockProvider {
        id: &'static str,
        delay: Duration,
        records: Vec<AssetRecord>,
        should_fail: bool,
        call_count: AtomicUsize,
    }

    impl MockProvider {
        fn new(id: &'static str, records: Vec<AssetRecord>) -> Self {
            Self {
                id,
                delay: Duration::ZERO,
                records,
                should_fail: false,
                call_count: AtomicUsize::new(0),
            }
        }

        fn failing(id: &'static str) -> Self {
            Self {
                should_fail: true,
                ..Self::new(id, Vec::new())
            }
        }

        fn delayed(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl AssetProvider for MockProvider {
        fn id(&self) -> &'static str {
            self.id
        }

        fn rate_limit(&self) -> RateLimit {
            RateLimit::per_minute(600)
        }

        async fn fetch_assets(&self, limit: usize) -> Result<Vec<AssetRecord>, MarketDataError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;

            if self.should_fail {
                return Err(MarketDataError::ProviderError {
                    provider: self.id.to_string(),
                    message: "HTTP 503".to_string(),
                });
            }
            Ok(self.records.iter().take(limit).cloned().collect())
        }
    }

    fn record(address: &str, source: &str) -> AssetRecord {
        AssetRecord::new(address, address, address, dec!(1), source)
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_all_preserves_registration_order() {
        let slow = Arc::new(
            MockProvider::new("slow", vec![record("a", "slow")]).delayed(Duration::from_secs(2)),
        );
        let fast = Arc::new(MockProvider::new("fast", vec![record("b", "fast")]));
        let registry = ProviderRegistry::new(vec![slow as Arc<dyn AssetProvider>, fast]);

        let results = registry.fetch_all(10).await;
        let order: Vec<_> = results.iter().map(|r| r.provider.as_str()).collect();
        assert_eq!(order, vec!["slow", "fast"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_all_runs_providers_concurrently() {
        let a = Arc::new(MockProvider::new("a", vec![]).delayed(Duration::from_secs(3)));
        let b = Arc::new(MockProvider::new("b", vec![]).delayed(Duration::from_secs(3)));
        let registry = ProviderRegistry::new(vec![a as Arc<dyn AssetProvider>, b]);

        let start = tokio::time::Instant::now();
        registry.fetch_all(10).await;
        assert!(start.elapsed() < Duration::from_secs(6));
    }

    #[tokio::test]
    async fn test_failing_provider_does_not_affect_others() {
        let failing = Arc::new(MockProvider::failing("broken"));
        let healthy = Arc::new(MockProvider::new("healthy", vec![record("x", "healthy")]));
        let registry = ProviderRegistry::new(vec![
            failing.clone() as Arc<dyn AssetProvider>,
            healthy.clone(),
        ]);

        let results = registry.fetch_all(10).await;
        assert!(!results[0].success);
        assert!(results[0].records.is_empty());
        assert!(results[1].success);
        assert_eq!(failing.call_count.load(Ordering::SeqCst), 1);
        assert_eq!(healthy.call_count.load(Ordering::SeqCst), 1);

        let contributed = ProviderRegistry::contributions(results);
        assert_eq!(contributed.len(), 1);
        assert_eq!(contributed[0].address, "x");
    }

    #[tokio::test]
    async fn test_fetch_all_drops_invalid_records() {
        let provider = Arc::new(MockProvider::new(
            "p",
            vec![record("", "p"), record("valid", "p")],
        ));
        let registry = ProviderRegistry::new(vec![provider as Arc<dyn AssetProvider>]);

        let results = registry.fetch_all(10).await;
        assert_eq!(results[0].records.len(), 1);
        assert_eq!(results[0].records[0].address, "valid");
    }

    #[tokio::test]
    async fn test_search_all_unsupported_degrades() {
        let provider = Arc::new(MockProvider::new("p", vec![record("a", "p")]));
        let registry = ProviderRegistry::new(vec![provider as Arc<dyn AssetProvider>]);

        let results = registry.search_all("anything").await;
        assert!(!results[0].success);
        assert!(ProviderRegistry::contributions(results).is_empty());
    }

    #[test]
    fn test_provider_ids() {
        let registry = ProviderRegistry::new(vec![
            Arc::new(MockProvider::new("one", vec![])) as Arc<dyn AssetProvider>,
            Arc::new(MockProvider::new("two", vec![])),
        ]);
        assert_eq!(registry.provider_ids(), vec!["one", "two"]);
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
    }
}
