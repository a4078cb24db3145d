//! TokenPulse Market Data Crate
//!
//! This crate fetches token metadata from several upstream providers and
//! reconciles it into one canonical record per asset.
//!
//! # Overview
//!
//! The market data crate supports:
//! - Multiple providers: DexScreener, GeckoTerminal, Jupiter
//! - Per-provider interval rate limiting and bounded retry
//! - Concurrent, order-preserving fan-out across providers
//! - Field-level conflict resolution when sources disagree
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! | ProviderRegistry |  (ordered fan-out, full join)
//! +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! |  AssetProvider   | --> |  ProviderClient  |  (rate limit, retry, HTTP)
//! +------------------+     +------------------+
//!          |
//!          v
//! +------------------+
//! |  ProviderResult  |  (records or degraded empty result)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |   merge_records  |  (one AssetRecord per identity)
//! +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`AssetRecord`] - Canonical per-asset snapshot
//! - [`ProviderResult`] - Outcome of one adapter call
//! - [`AssetProvider`] - Capability interface every adapter implements
//! - [`ProviderRegistry`] - Ordered collection of adapters

pub mod errors;
pub mod merge;
pub mod models;
pub mod provider;
pub mod registry;

// Re-export all public types from models
pub use models::{AssetAddress, AssetRecord, ProviderId, ProviderResult};

// Re-export provider types
pub use provider::dexscreener::DexScreenerProvider;
pub use provider::geckoterminal::GeckoTerminalProvider;
pub use provider::jupiter::JupiterProvider;
pub use provider::{AssetProvider, ProviderEndpoint, RateLimit};

// Re-export registry types
pub use registry::{
    AssetValidator, ProviderRegistry, RateLimiter, RetryPolicy, ValidationSeverity,
    ValidatorConfig,
};

pub use errors::{MarketDataError, RetryClass};
pub use merge::{merge_records, merge_records_at};
