use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::AssetAddress;

/// Canonical per-asset snapshot.
///
/// Prices and sizes are denominated in the reference unit (SOL). Adapters
/// build a fresh record per upstream item; the merge engine produces new
/// records instead of mutating existing ones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    /// Identity used as the merge key (mint address)
    pub address: AssetAddress,

    /// Display name (e.g., "Bonk")
    pub name: String,

    /// Ticker symbol (e.g., "BONK")
    pub ticker: String,

    /// Price in the reference unit
    pub price: Decimal,

    /// Market capitalization in the reference unit
    pub market_cap: Decimal,

    /// Trading volume over the provider's 24h window
    pub volume: Decimal,

    /// Pool liquidity in the reference unit
    pub liquidity: Decimal,

    /// Number of transactions over the 24h window
    pub transaction_count: u64,

    /// Percentage price change, 1 hour
    pub price_change_1h: Decimal,

    /// Percentage price change, 24 hours
    pub price_change_24h: Decimal,

    /// Percentage price change, 7 days
    pub price_change_7d: Decimal,

    /// Venue / protocol label (e.g., "raydium")
    pub protocol: String,

    /// When this snapshot was produced
    pub last_updated: DateTime<Utc>,

    /// Names of the providers that contributed to this record
    pub sources: Vec<String>,
}

impl AssetRecord {
    /// Create a record with the fields every adapter must populate.
    /// Everything else starts at zero.
    pub fn new(
        address: impl Into<AssetAddress>,
        name: impl Into<String>,
        ticker: impl Into<String>,
        price: Decimal,
        source: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            name: name.into(),
            ticker: ticker.into(),
            price,
            market_cap: Decimal::ZERO,
            volume: Decimal::ZERO,
            liquidity: Decimal::ZERO,
            transaction_count: 0,
            price_change_1h: Decimal::ZERO,
            price_change_24h: Decimal::ZERO,
            price_change_7d: Decimal::ZERO,
            protocol: String::new(),
            last_updated: Utc::now(),
            sources: vec![source.into()],
        }
    }

    pub fn with_market_cap(mut self, market_cap: Decimal) -> Self {
        self.market_cap = market_cap;
        self
    }

    pub fn with_volume(mut self, volume: Decimal) -> Self {
        self.volume = volume;
        self
    }

    pub fn with_liquidity(mut self, liquidity: Decimal) -> Self {
        self.liquidity = liquidity;
        self
    }

    pub fn with_transaction_count(mut self, count: u64) -> Self {
        self.transaction_count = count;
        self
    }

    /// Set the 1h / 24h / 7d percentage changes.
    pub fn with_price_changes(mut self, h1: Decimal, h24: Decimal, d7: Decimal) -> Self {
        self.price_change_1h = h1;
        self.price_change_24h = h24;
        self.price_change_7d = d7;
        self
    }

    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    pub fn with_last_updated(mut self, last_updated: DateTime<Utc>) -> Self {
        self.last_updated = last_updated;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_defaults_optional_fields_to_zero() {
        let record = AssetRecord::new("mint1", "Bonk", "BONK", dec!(0.0000002), "jupiter");
        assert_eq!(record.address, "mint1");
        assert_eq!(record.market_cap, Decimal::ZERO);
        assert_eq!(record.transaction_count, 0);
        assert_eq!(record.price_change_7d, Decimal::ZERO);
        assert_eq!(record.sources, vec!["jupiter".to_string()]);
    }

    #[test]
    fn test_serializes_camel_case_with_exact_decimals() {
        let record = AssetRecord::new("mint1", "Bonk", "BONK", dec!(0.1), "dexscreener")
            .with_volume(dec!(1234.5678));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["priceChange1h"], "0");
        assert_eq!(json["volume"], "1234.5678");

        let back: AssetRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
