//! DexScreener provider implementation.
//!
//! Uses the pair search endpoint for both listing and search, keeping only
//! Solana pairs. Prices come quoted in the pair's native unit; USD figures
//! are converted with the SOL/USD rate implied by each pair.
//!
//! Free tier allows 300 requests per minute.
//! API documentation: https://docs.dexscreener.com/api/reference

mod models;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use rust_decimal::Decimal;
use tracing::info;

use crate::errors::MarketDataError;
use crate::models::AssetRecord;
use crate::provider::client::ProviderClient;
use crate::provider::convert::{
    decimal_from_f64, decimal_from_str, implied_reference_price, usd_to_reference,
};
use crate::provider::{AssetProvider, ProviderEndpoint, RateLimit};

use models::{Pair, SearchResponse};

pub const BASE_URL: &str = "https://api.dexscreener.com/latest/dex";
pub const PROVIDER_ID: &str = "dexscreener";
pub const REQUESTS_PER_MINUTE: u32 = 300;

const SOLANA_CHAIN: &str = "solana";
const LISTING_QUERY: &str = "solana";

/// DexScreener provider.
pub struct DexScreenerProvider {
    client: ProviderClient,
    /// Fallback USD price of one SOL when a pair gives no usable rate.
    reference_usd_price: Decimal,
}

impl DexScreenerProvider {
    pub fn new(client: Client, endpoint: ProviderEndpoint, reference_usd_price: Decimal) -> Self {
        Self {
            client: ProviderClient::new(PROVIDER_ID, client, endpoint),
            reference_usd_price,
        }
    }

    /// Provider with the public endpoint and default budget.
    pub fn with_defaults(client: Client, reference_usd_price: Decimal) -> Self {
        Self::new(
            client,
            ProviderEndpoint::new(BASE_URL, REQUESTS_PER_MINUTE),
            reference_usd_price,
        )
    }

    async fn search_pairs(&self, query: &str) -> Result<Vec<Pair>, MarketDataError> {
        let response: SearchResponse = self
            .client
            .get_json("/search", &[("q", query.to_string())])
            .await?;
        Ok(response.pairs.unwrap_or_default())
    }

    fn transform_pairs(&self, pairs: Vec<Pair>, limit: Option<usize>) -> Vec<AssetRecord> {
        pairs
            .into_iter()
            .filter(|pair| pair.chain_id == SOLANA_CHAIN)
            .take(limit.unwrap_or(usize::MAX))
            .map(|pair| self.transform_pair(pair))
            .collect()
    }

    fn transform_pair(&self, pair: Pair) -> AssetRecord {
        let price = decimal_from_str(pair.price_native.as_deref());
        let price_usd = decimal_from_str(pair.price_usd.as_deref());
        let sol_usd =
            implied_reference_price(price_usd, price).unwrap_or(self.reference_usd_price);

        let market_cap_usd = decimal_from_f64(pair.market_cap.or(pair.fdv));
        let volume_usd = decimal_from_f64(pair.volume.as_ref().and_then(|v| v.h24));
        let liquidity_usd = decimal_from_f64(pair.liquidity.as_ref().and_then(|l| l.usd));
        let transaction_count = pair
            .txns
            .as_ref()
            .and_then(|t| t.h24.as_ref())
            .map(|t| t.buys.saturating_add(t.sells))
            .unwrap_or(0);
        let change_1h = decimal_from_f64(pair.price_change.as_ref().and_then(|c| c.h1));
        let change_24h = decimal_from_f64(pair.price_change.as_ref().and_then(|c| c.h24));

        AssetRecord::new(
            pair.base_token.address,
            pair.base_token.name,
            pair.base_token.symbol,
            price,
            PROVIDER_ID,
        )
        .with_market_cap(usd_to_reference(market_cap_usd, sol_usd))
        .with_volume(usd_to_reference(volume_usd, sol_usd))
        .with_liquidity(usd_to_reference(liquidity_usd, sol_usd))
        .with_transaction_count(transaction_count)
        .with_price_changes(change_1h, change_24h, Decimal::ZERO)
        .with_protocol(pair.dex_id)
        .with_last_updated(Utc::now())
    }
}

#[async_trait]
impl AssetProvider for DexScreenerProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn rate_limit(&self) -> RateLimit {
        self.client.endpoint().rate_limit.clone()
    }

    async fn fetch_assets(&self, limit: usize) -> Result<Vec<AssetRecord>, MarketDataError> {
        let pairs = self.search_pairs(LISTING_QUERY).await?;
        let records = self.transform_pairs(pairs, Some(limit));
        info!("DexScreener: fetched {} tokens", records.len());
        Ok(records)
    }

    async fn search_assets(&self, query: &str) -> Result<Vec<AssetRecord>, MarketDataError> {
        let pairs = self.search_pairs(query).await?;
        Ok(self.transform_pairs(pairs, None))
    }
}
