use serde::{Deserialize, Serialize};

use tokenpulse_market_data::AssetRecord;

/// Pagination metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub limit: usize,
    /// Present only when records remain past this page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    /// Size of the filtered set across all pages
    pub total: usize,
}

/// One page of records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub data: Vec<AssetRecord>,
    pub pagination: PageInfo,
}

impl Page {
    pub fn empty(limit: usize) -> Self {
        Self {
            data: Vec::new(),
            pagination: PageInfo {
                limit,
                next_cursor: None,
                total: 0,
            },
        }
    }
}
