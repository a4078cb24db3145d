//! GeckoTerminal API response models (JSON:API layout).

use std::collections::HashMap;

use serde::Deserialize;

/// Pool listing with side-loaded tokens (`include=base_token`)
#[derive(Debug, Deserialize)]
pub struct PoolsResponse {
    #[serde(default)]
    pub data: Vec<Pool>,
    #[serde(default)]
    pub included: Vec<IncludedToken>,
}

#[derive(Debug, Deserialize)]
pub struct Pool {
    pub id: String,
    pub attributes: PoolAttributes,
    #[serde(default)]
    pub relationships: Option<PoolRelationships>,
}

#[derive(Debug, Deserialize)]
pub struct PoolAttributes {
    pub base_token_price_usd: Option<String>,
    pub base_token_price_native_currency: Option<String>,
    pub reserve_in_usd: Option<String>,
    pub volume_usd: Option<Windowed<String>>,
    pub price_change_percentage: Option<Windowed<String>>,
    pub transactions: Option<Windowed<TxnCount>>,
}

#[derive(Debug, Deserialize)]
pub struct Windowed<T> {
    pub h1: Option<T>,
    pub h24: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct TxnCount {
    #[serde(default)]
    pub buys: u64,
    #[serde(default)]
    pub sells: u64,
}

#[derive(Debug, Deserialize)]
pub struct PoolRelationships {
    pub base_token: Option<Relationship>,
    pub dex: Option<Relationship>,
}

#[derive(Debug, Deserialize)]
pub struct Relationship {
    pub data: Option<ResourceRef>,
}

#[derive(Debug, Deserialize)]
pub struct ResourceRef {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct IncludedToken {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: TokenAttributes,
}

#[derive(Debug, Deserialize)]
pub struct TokenAttributes {
    pub address: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
}

impl PoolsResponse {
    /// Index side-loaded tokens by resource id.
    pub fn token_index(&self) -> HashMap<&str, &TokenAttributes> {
        self.included
            .iter()
            .filter(|item| item.kind == "token")
            .map(|item| (item.id.as_str(), &item.attributes))
            .collect()
    }
}

impl Pool {
    pub fn base_token_id(&self) -> Option<&str> {
        self.relationships
            .as_ref()?
            .base_token
            .as_ref()?
            .data
            .as_ref()
            .map(|r| r.id.as_str())
    }

    pub fn dex_id(&self) -> Option<&str> {
        self.relationships
            .as_ref()?
            .dex
            .as_ref()?
            .data
            .as_ref()
            .map(|r| r.id.as_str())
    }
}
