//! Aggregation orchestrator.
//!
//! ```text
//! AggregatorService → ProviderRegistry (parallel, ordered) → merge_records
//!        ↓                                                        ↓
//!   CacheService  ←──────────── sorted / ranked / paged ←─────────┘
//! ```

mod ranking;
mod service;


pub use ranking::rank_search_results;
pub use service::{
    AggregatorConfig, AggregatorService, AggregatorServiceTrait, FILTER_SOURCE_LIMIT,
    SEARCH_CACHE_TTL,
};
