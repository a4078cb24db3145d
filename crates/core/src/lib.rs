//! TokenPulse Core - caching, querying, aggregation and change detection.
//!
//! This crate sits on top of `tokenpulse-market-data`: it merges what the
//! provider registry returns, caches it, answers filtered and paginated
//! queries, and turns successive snapshots into change events.

pub mod aggregator;
pub mod cache;
pub mod detector;
pub mod errors;
pub mod events;
pub mod query;
pub mod scheduler;

pub use aggregator::{AggregatorConfig, AggregatorService, AggregatorServiceTrait};
pub use cache::{CacheService, CacheStore, MemoryCacheStore};
pub use detector::{ChangeDetector, DetectorConfig};
pub use events::{BroadcastHub, ChangeEvent, ChangeEventSink, TopicSink, TOKEN_UPDATES_TOPIC};
pub use query::{Page, PageInfo, QueryFilter, SortKey, SortOrder, TimePeriod};
pub use scheduler::Scheduler;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
