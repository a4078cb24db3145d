//! Asset provider abstractions and implementations.
//!
//! This module contains:
//! - The `AssetProvider` trait that all adapters implement
//! - Endpoint and rate limiting configuration
//! - The shared HTTP plumbing (`ProviderClient`)
//! - Concrete adapters (DexScreener, GeckoTerminal, Jupiter)
//!
//! Adapters never see each other. The registry holds them as
//! `Arc<dyn AssetProvider>` and never discriminates by concrete type.

mod capabilities;
mod client;
mod convert;
mod traits;

pub mod dexscreener;
pub mod geckoterminal;
pub mod jupiter;

// Re-exports
pub use capabilities::{ProviderEndpoint, RateLimit};
pub use client::{ProviderClient, USER_AGENT};
pub use traits::AssetProvider;
