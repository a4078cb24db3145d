//! Jupiter provider implementation.
//!
//! Price API v2 quoted against SOL for a fixed set of well-known mints.
//! Only price and a derived 24h change are available; there is no search.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::errors::MarketDataError;
use crate::models::AssetRecord;
use crate::provider::client::ProviderClient;
use crate::provider::convert::decimal_from_str;
use crate::provider::{AssetProvider, ProviderEndpoint, RateLimit};

pub const BASE_URL: &str = "https://api.jup.ag";
pub const PROVIDER_ID: &str = "jupiter";
pub const REQUESTS_PER_MINUTE: u32 = 600;

/// Wrapped SOL mint, used as the quote token.
pub const SOL_MINT: &str = "So11111111111111111111111111111111111111112";

const PROTOCOL: &str = "Jupiter";

/// Well-known mints, in request order.
const KNOWN_MINTS: [(&str, &str); 8] = [
    ("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v", "USDC"),
    ("Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB", "USDT"),
    (SOL_MINT, "SOL"),
    ("DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263", "BONK"),
    ("J1toso1uCk3RLmjorhTtrVwY9HJ7X8V9yYac6Y7kGCPn", "JitoSOL"),
    ("JUPyiwrYJFskUPiHa7hkeR8VUtAeFoSYbKedZNsDvCN", "JUP"),
    ("mSoLzYCxHdYgdzU16g5QSh3i5K3z3KZK7ytfqcJm7So", "mSOL"),
    ("bSo13r4TkiE4KumL71LsHTPpL2euBYLFx6h9HP3piy1", "bSOL"),
];

#[derive(Debug, Deserialize)]
struct PriceResponse {
    #[serde(default)]
    data: HashMap<String, Option<PriceData>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceData {
    id: String,
    price: Option<String>,
    extra_info: Option<ExtraInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtraInfo {
    last_swapped_price: Option<LastSwappedPrice>,
    quoted_price: Option<QuotedPrice>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LastSwappedPrice {
    last_jupiter_buy_price: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuotedPrice {
    buy_price: Option<String>,
}

/// Symbol for a mint, or its first 8 characters when unknown.
fn symbol_for(mint: &str) -> String {
    KNOWN_MINTS
        .iter()
        .find(|(address, _)| *address == mint)
        .map(|(_, symbol)| symbol.to_string())
        .unwrap_or_else(|| mint.chars().take(8).collect())
}

/// Percent change of the current buy quote against the last swap price.
fn change_24h(info: &ExtraInfo) -> Decimal {
    let current = info
        .quoted_price
        .as_ref()
        .map(|q| decimal_from_str(q.buy_price.as_deref()))
        .unwrap_or(Decimal::ZERO);
    let last = info
        .last_swapped_price
        .as_ref()
        .map(|l| decimal_from_str(l.last_jupiter_buy_price.as_deref()))
        .unwrap_or(Decimal::ZERO);

    if current.is_zero() || last.is_zero() {
        return Decimal::ZERO;
    }
    current
        .checked_sub(last)
        .and_then(|delta| delta.checked_div(last))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|pct| pct.round_dp(6))
        .unwrap_or(Decimal::ZERO)
}

/// Jupiter price provider.
pub struct JupiterProvider {
    client: ProviderClient,
}

impl JupiterProvider {
    pub fn new(client: Client, endpoint: ProviderEndpoint) -> Self {
        Self {
            client: ProviderClient::new(PROVIDER_ID, client, endpoint),
        }
    }

    pub fn with_defaults(client: Client) -> Self {
        Self::new(client, ProviderEndpoint::new(BASE_URL, REQUESTS_PER_MINUTE))
    }

    fn requested_mints(limit: usize) -> Vec<&'static str> {
        KNOWN_MINTS
            .iter()
            .take(limit)
            .map(|(address, _)| *address)
            .collect()
    }

    fn transform_response(mints: &[&str], mut response: PriceResponse) -> Vec<AssetRecord> {
        mints
            .iter()
            .filter_map(|mint| response.data.remove(*mint).flatten())
            .map(Self::transform_price)
            .collect()
    }

    fn transform_price(data: PriceData) -> AssetRecord {
        let price = decimal_from_str(data.price.as_deref());
        let change = data
            .extra_info
            .as_ref()
            .map(change_24h)
            .unwrap_or(Decimal::ZERO);
        let symbol = symbol_for(&data.id);

        AssetRecord::new(data.id, symbol.clone(), symbol, price, PROVIDER_ID)
            .with_price_changes(Decimal::ZERO, change, Decimal::ZERO)
            .with_protocol(PROTOCOL)
            .with_last_updated(Utc::now())
    }
}

#[async_trait]
impl AssetProvider for JupiterProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn rate_limit(&self) -> RateLimit {
        self.client.endpoint().rate_limit.clone()
    }

    async fn fetch_assets(&self, limit: usize) -> Result<Vec<AssetRecord>, MarketDataError> {
        let mints = Self::requested_mints(limit);
        if mints.is_empty() {
            return Ok(Vec::new());
        }

        let response: PriceResponse = self
            .client
            .get_json(
                "/price/v2",
                &[
                    ("ids", mints.join(",")),
                    ("vsToken", SOL_MINT.to_string()),
                    ("showExtraInfo", "true".to_string()),
                ],
            )
            .await?;

        let records = Self::transform_response(&mints, response);
        info!("Jupiter: fetched {} tokens", records.len());
        Ok(records)
    }

    async fn search_assets(&self, _query: &str) -> Result<Vec<AssetRecord>, MarketDataError> {
        // Price API has no search endpoint
        Ok(Vec::new())
    }
}
