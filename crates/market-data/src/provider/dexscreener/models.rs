//! DexScreener API response models.

use serde::Deserialize;

/// Response from the /search endpoint
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    /// Matching pairs; null when nothing matched
    #[serde(default)]
    pub pairs: Option<Vec<Pair>>,
}

/// A trading pair
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pair {
    pub chain_id: String,
    pub dex_id: String,
    pub base_token: BaseToken,
    /// Price of the base token in the quote token
    pub price_native: Option<String>,
    /// Price of the base token in USD
    pub price_usd: Option<String>,
    pub liquidity: Option<Liquidity>,
    pub fdv: Option<f64>,
    pub market_cap: Option<f64>,
    pub volume: Option<Windowed<f64>>,
    pub price_change: Option<Windowed<f64>>,
    pub txns: Option<Windowed<TxnCount>>,
}

#[derive(Debug, Deserialize)]
pub struct BaseToken {
    pub address: String,
    pub name: String,
    pub symbol: String,
}

#[derive(Debug, Deserialize)]
pub struct Liquidity {
    pub usd: Option<f64>,
    // Note: base / quote amounts exist but are not in the reference unit
}

/// Values reported per time window
#[derive(Debug, Deserialize)]
pub struct Windowed<T> {
    pub h1: Option<T>,
    pub h24: Option<T>,
    // Note: m5 and h6 exist but are not used
}

#[derive(Debug, Deserialize)]
pub struct TxnCount {
    #[serde(default)]
    pub buys: u64,
    #[serde(default)]
    pub sells: u64,
}
