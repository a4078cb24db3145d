//! Aggregation orchestrator: fan out, merge, rank and cache.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use serde::Serialize;

use tokenpulse_market_data::{merge_records, AssetRecord, ProviderRegistry};

use super::ranking::rank_search_results;
use crate::cache::CacheService;
use crate::query::{run_query, Page, QueryFilter};

/// Number of merged records pulled before filtering and paging.
pub const FILTER_SOURCE_LIMIT: usize = 1000;

/// How long search results stay cached.
pub const SEARCH_CACHE_TTL: Duration = Duration::from_secs(60);

const SUBJECT: &str = "tokens";

#[derive(Clone, Debug)]
pub struct AggregatorConfig {
    pub filter_source_limit: usize,
    pub search_ttl: Duration,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            filter_source_limit: FILTER_SOURCE_LIMIT,
            search_ttl: SEARCH_CACHE_TTL,
        }
    }
}

/// Entry point for everything that reads aggregated assets.
///
/// None of these operations fail: provider and cache failures degrade to
/// fewer, empty or uncached results.
#[async_trait]
pub trait AggregatorServiceTrait: Send + Sync {
    /// Merged records sorted by descending volume, at most `limit`.
    async fn aggregate(&self, limit: usize) -> Vec<AssetRecord>;

    /// Merged search results ranked by relevance, at most `limit`.
    ///
    /// Rejecting an empty query is the caller's job.
    async fn search(&self, query: &str, limit: usize) -> Vec<AssetRecord>;

    /// One page of the filtered and sorted aggregate.
    async fn get_filtered(&self, filter: &QueryFilter) -> Page;

    /// Drop every cached entry in this service's namespace.
    async fn invalidate_all(&self);
}

#[derive(Serialize)]
struct LimitParams {
    limit: usize,
}

#[derive(Serialize)]
struct SearchParams<'a> {
    query: &'a str,
    limit: usize,
}

pub struct AggregatorService {
    registry: Arc<ProviderRegistry>,
    cache: CacheService,
    config: AggregatorConfig,
}

impl AggregatorService {
    pub fn new(registry: Arc<ProviderRegistry>, cache: CacheService) -> Self {
        Self::with_config(registry, cache, AggregatorConfig::default())
    }

    pub fn with_config(
        registry: Arc<ProviderRegistry>,
        cache: CacheService,
        config: AggregatorConfig,
    ) -> Self {
        Self {
            registry,
            cache,
            config,
        }
    }

    pub fn cache(&self) -> &CacheService {
        &self.cache
    }
}

#[async_trait]
impl AggregatorServiceTrait for AggregatorService {
    async fn aggregate(&self, limit: usize) -> Vec<AssetRecord> {
        let key = CacheService::cache_key("aggregated", SUBJECT, &LimitParams { limit });

        if let Some(cached) = self.cache.get::<Vec<AssetRecord>>(&key).await {
            debug!("Returning cached aggregated tokens");
            return cached;
        }

        let results = self.registry.fetch_all(limit).await;
        let mut merged = merge_records(ProviderRegistry::contributions(results));
        merged.sort_by(|a, b| b.volume.cmp(&a.volume));
        merged.truncate(limit);

        self.cache.set(&key, &merged, None).await;

        info!(
            "Aggregated {} tokens from {} providers",
            merged.len(),
            self.registry.len()
        );
        merged
    }

    async fn search(&self, query: &str, limit: usize) -> Vec<AssetRecord> {
        let key = CacheService::cache_key("search", SUBJECT, &SearchParams { query, limit });

        if let Some(cached) = self.cache.get::<Vec<AssetRecord>>(&key).await {
            debug!("Returning cached search results for '{}'", query);
            return cached;
        }

        let results = self.registry.search_all(query).await;
        let mut merged = merge_records(ProviderRegistry::contributions(results));
        rank_search_results(&mut merged, query);
        merged.truncate(limit);

        self.cache
            .set(&key, &merged, Some(self.config.search_ttl))
            .await;

        debug!("Search '{}' matched {} tokens", query, merged.len());
        merged
    }

    async fn get_filtered(&self, filter: &QueryFilter) -> Page {
        let key = CacheService::cache_key("filtered", SUBJECT, filter);

        if let Some(cached) = self.cache.get::<Page>(&key).await {
            debug!("Returning cached filtered page");
            return cached;
        }

        let records = self.aggregate(self.config.filter_source_limit).await;
        let page = run_query(records, filter);

        self.cache.set(&key, &page, None).await;
        page
    }

    async fn invalidate_all(&self) {
        let removed = self.cache.invalidate_pattern("*").await;
        info!("All cache invalidated ({} entries)", removed);
    }
}
