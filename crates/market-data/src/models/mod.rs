//! Market data models
//!
//! This module contains the core data types for aggregation:
//! - `types` - Type aliases for common identifiers (ProviderId, AssetAddress)
//! - `asset` - The canonical per-asset snapshot (AssetRecord)
//! - `provider_result` - Outcome of a single adapter invocation (ProviderResult)

mod asset;
mod provider_result;
mod types;

pub use asset::AssetRecord;
pub use provider_result::ProviderResult;
pub use types::{AssetAddress, ProviderId};
