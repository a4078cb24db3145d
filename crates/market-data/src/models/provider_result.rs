use serde::{Deserialize, Serialize};

use super::asset::AssetRecord;
use crate::errors::MarketDataError;

/// Outcome of one adapter invocation.
///
/// Adapter failures stop here: a failed call becomes an empty record list
/// with `success == false` and a description of what went wrong.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProviderResult {
    /// Provider that produced this result
    pub provider: String,

    /// Records in upstream order
    pub records: Vec<AssetRecord>,

    /// Whether the upstream call succeeded
    pub success: bool,

    /// Error description when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProviderResult {
    pub fn ok(provider: impl Into<String>, records: Vec<AssetRecord>) -> Self {
        Self {
            provider: provider.into(),
            records,
            success: true,
            error: None,
        }
    }

    pub fn failed(provider: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            records: Vec::new(),
            success: false,
            error: Some(error.into()),
        }
    }

    /// Fold an adapter outcome into a result that never carries an error value.
    pub fn from_outcome(
        provider: impl Into<String>,
        outcome: Result<Vec<AssetRecord>, MarketDataError>,
    ) -> Self {
        match outcome {
            Ok(records) => Self::ok(provider, records),
            Err(e) => Self::failed(provider, e.to_string()),
        }
    }

    /// Records contributed to an aggregation: empty when the call failed.
    pub fn into_contribution(self) -> Vec<AssetRecord> {
        if self.success {
            self.records
        } else {
            Vec::new()
        }
    }
}
