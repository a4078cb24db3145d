use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default page size.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Requested time window.
///
/// Accepted and carried through cache keys, but records hold no history,
/// so it does not change results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimePeriod {
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "24h")]
    OneDay,
    #[serde(rename = "7d")]
    SevenDays,
}

impl FromStr for TimePeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1h" => Ok(Self::OneHour),
            "24h" => Ok(Self::OneDay),
            "7d" => Ok(Self::SevenDays),
            other => Err(format!("unknown time period '{}'", other)),
        }
    }
}

/// Field to sort by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Volume,
    /// Sorts on the 1h change.
    PriceChange,
    MarketCap,
    Liquidity,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "volume" => Ok(Self::Volume),
            "price_change" => Ok(Self::PriceChange),
            "market_cap" => Ok(Self::MarketCap),
            "liquidity" => Ok(Self::Liquidity),
            other => Err(format!("unknown sort key '{}'", other)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Volume => "volume",
            Self::PriceChange => "price_change",
            Self::MarketCap => "market_cap",
            Self::Liquidity => "liquidity",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort order '{}'", other)),
        }
    }
}

/// Filter, sort and page request over the merged set.
///
/// Field order is part of the cache key derivation; keep it stable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryFilter {
    pub time_period: Option<TimePeriod>,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
    pub min_volume: Option<Decimal>,
    pub min_market_cap: Option<Decimal>,
    pub limit: usize,
    pub cursor: Option<String>,
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self {
            time_period: None,
            sort_by: SortKey::default(),
            sort_order: SortOrder::default(),
            min_volume: None,
            min_market_cap: None,
            limit: DEFAULT_PAGE_SIZE,
            cursor: None,
        }
    }
}

impl QueryFilter {
    pub fn with_sort(mut self, sort_by: SortKey, sort_order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.sort_order = sort_order;
        self
    }

    pub fn with_min_volume(mut self, min_volume: Decimal) -> Self {
        self.min_volume = Some(min_volume);
        self
    }

    pub fn with_min_market_cap(mut self, min_market_cap: Decimal) -> Self {
        self.min_market_cap = Some(min_market_cap);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }
}
