//! GeckoTerminal provider implementation.
//!
//! Lists trending Solana pools and resolves each pool's base token from the
//! side-loaded `included` section. Market cap is not taken from this source.
//!
//! Public API allows 300 requests per minute.
//! API documentation: https://apiguide.geckoterminal.com

mod models;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::errors::MarketDataError;
use crate::models::AssetRecord;
use crate::provider::client::ProviderClient;
use crate::provider::convert::{decimal_from_str, implied_reference_price, usd_to_reference};
use crate::provider::{AssetProvider, ProviderEndpoint, RateLimit};

use models::{Pool, PoolsResponse, TokenAttributes};

pub const BASE_URL: &str = "https://api.geckoterminal.com/api/v2";
pub const PROVIDER_ID: &str = "geckoterminal";
pub const REQUESTS_PER_MINUTE: u32 = 300;

const NETWORK: &str = "solana";
const MAX_PAGE_SIZE: usize = 100;

/// GeckoTerminal provider.
pub struct GeckoTerminalProvider {
    client: ProviderClient,
    reference_usd_price: Decimal,
}

impl GeckoTerminalProvider {
    pub fn new(client: Client, endpoint: ProviderEndpoint, reference_usd_price: Decimal) -> Self {
        Self {
            client: ProviderClient::new(PROVIDER_ID, client, endpoint),
            reference_usd_price,
        }
    }

    pub fn with_defaults(client: Client, reference_usd_price: Decimal) -> Self {
        Self::new(
            client,
            ProviderEndpoint::new(BASE_URL, REQUESTS_PER_MINUTE),
            reference_usd_price,
        )
    }

    fn transform_response(&self, response: PoolsResponse, limit: Option<usize>) -> Vec<AssetRecord> {
        let tokens = response.token_index();

        response
            .data
            .iter()
            .take(limit.unwrap_or(usize::MAX))
            .filter_map(|pool| {
                let token = pool.base_token_id().and_then(|id| tokens.get(id).copied());
                match token {
                    Some(token) => self.transform_pool(pool, token),
                    None => {
                        debug!("GeckoTerminal: pool {} has no resolvable base token", pool.id);
                        None
                    }
                }
            })
            .collect()
    }

    fn transform_pool(&self, pool: &Pool, token: &TokenAttributes) -> Option<AssetRecord> {
        let attr = &pool.attributes;
        let price_native = decimal_from_str(attr.base_token_price_native_currency.as_deref());
        let price_usd = decimal_from_str(attr.base_token_price_usd.as_deref());

        let sol_usd =
            implied_reference_price(price_usd, price_native).unwrap_or(self.reference_usd_price);
        let price = if price_native > Decimal::ZERO {
            price_native
        } else {
            usd_to_reference(price_usd, sol_usd)
        };
        if price <= Decimal::ZERO {
            return None;
        }

        let volume_usd = decimal_from_str(
            attr.volume_usd
                .as_ref()
                .and_then(|v| v.h24.as_deref()),
        );
        let liquidity_usd = decimal_from_str(attr.reserve_in_usd.as_deref());
        let transaction_count = attr
            .transactions
            .as_ref()
            .and_then(|t| t.h24.as_ref())
            .map(|t| t.buys.saturating_add(t.sells))
            .unwrap_or(0);
        let changes = attr.price_change_percentage.as_ref();
        let change_1h = decimal_from_str(changes.and_then(|c| c.h1.as_deref()));
        let change_24h = decimal_from_str(changes.and_then(|c| c.h24.as_deref()));

        Some(
            AssetRecord::new(
                token.address.clone(),
                token.name.clone(),
                token.symbol.clone(),
                price,
                PROVIDER_ID,
            )
            .with_volume(usd_to_reference(volume_usd, sol_usd))
            .with_liquidity(usd_to_reference(liquidity_usd, sol_usd))
            .with_transaction_count(transaction_count)
            .with_price_changes(change_1h, change_24h, Decimal::ZERO)
            .with_protocol(pool.dex_id().unwrap_or(PROVIDER_ID))
            .with_last_updated(Utc::now()),
        )
    }
}

#[async_trait]
impl AssetProvider for GeckoTerminalProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn rate_limit(&self) -> RateLimit {
        self.client.endpoint().rate_limit.clone()
    }

    async fn fetch_assets(&self, limit: usize) -> Result<Vec<AssetRecord>, MarketDataError> {
        let path = format!("/networks/{}/trending_pools", NETWORK);
        let response: PoolsResponse = self
            .client
            .get_json(
                &path,
                &[
                    ("include", "base_token".to_string()),
                    ("page", "1".to_string()),
                ],
            )
            .await?;

        let records = self.transform_response(response, Some(limit.min(MAX_PAGE_SIZE)));
        info!("GeckoTerminal: fetched {} tokens from pools", records.len());
        Ok(records)
    }

    async fn search_assets(&self, query: &str) -> Result<Vec<AssetRecord>, MarketDataError> {
        let response: PoolsResponse = self
            .client
            .get_json(
                "/search/pools",
                &[
                    ("query", query.to_string()),
                    ("network", NETWORK.to_string()),
                    ("include", "base_token".to_string()),
                ],
            )
            .await?;

        Ok(self.transform_response(response, None))
    }
}
