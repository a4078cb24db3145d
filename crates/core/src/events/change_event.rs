//! Change event types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tokenpulse_market_data::AssetRecord;

/// Topic every change event is published to.
pub const TOKEN_UPDATES_TOPIC: &str = "token_updates";

/// A notable change between two successive snapshots.
///
/// Serialized as `{"type": "...", "data": AssetRecord, "timestamp": ...}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeEvent {
    /// Asset seen for the first time.
    NewAsset {
        data: AssetRecord,
        timestamp: DateTime<Utc>,
    },

    /// Price moved past the relative threshold.
    PriceUpdate {
        data: AssetRecord,
        timestamp: DateTime<Utc>,
    },

    /// Volume jumped past the spike multiplier.
    VolumeSpike {
        data: AssetRecord,
        timestamp: DateTime<Utc>,
    },
}

impl ChangeEvent {
    pub fn new_asset(data: AssetRecord, timestamp: DateTime<Utc>) -> Self {
        Self::NewAsset { data, timestamp }
    }

    pub fn price_update(data: AssetRecord, timestamp: DateTime<Utc>) -> Self {
        Self::PriceUpdate { data, timestamp }
    }

    pub fn volume_spike(data: AssetRecord, timestamp: DateTime<Utc>) -> Self {
        Self::VolumeSpike { data, timestamp }
    }

    /// Wire name of the event type.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NewAsset { .. } => "new_asset",
            Self::PriceUpdate { .. } => "price_update",
            Self::VolumeSpike { .. } => "volume_spike",
        }
    }

    pub fn record(&self) -> &AssetRecord {
        match self {
            Self::NewAsset { data, .. }
            | Self::PriceUpdate { data, .. }
            | Self::VolumeSpike { data, .. } => data,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::NewAsset { timestamp, .. }
            | Self::PriceUpdate { timestamp, .. }
            | Self::VolumeSpike { timestamp, .. } => *timestamp,
        }
    }
}
