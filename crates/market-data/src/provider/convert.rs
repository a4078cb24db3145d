//! Numeric helpers shared by adapters.
//!
//! Upstream payloads mix JSON numbers and numeric strings and omit fields
//! freely. Everything missing or unparseable becomes zero.

use std::str::FromStr;

use num_traits::FromPrimitive;
use rust_decimal::Decimal;

/// Convert an optional float, treating `None`, NaN and infinities as zero.
pub(crate) fn decimal_from_f64(value: Option<f64>) -> Decimal {
    value
        .filter(|v| v.is_finite())
        .and_then(Decimal::from_f64)
        .unwrap_or(Decimal::ZERO)
}

/// Parse an optional numeric string. Scientific notation is accepted.
pub(crate) fn decimal_from_str(value: Option<&str>) -> Decimal {
    let Some(raw) = value.map(str::trim).filter(|s| !s.is_empty()) else {
        return Decimal::ZERO;
    };

    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .unwrap_or_else(|_| decimal_from_f64(raw.parse::<f64>().ok()))
}

/// Convert a USD-denominated amount into the reference unit using a USD price
/// of one reference unit. A non-positive rate yields zero.
pub(crate) fn usd_to_reference(amount_usd: Decimal, reference_usd_price: Decimal) -> Decimal {
    if reference_usd_price <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    amount_usd.checked_div(reference_usd_price).unwrap_or(Decimal::ZERO)
}

/// Derive the USD price of one reference unit from a pair quoted in both.
pub(crate) fn implied_reference_price(price_usd: Decimal, price_native: Decimal) -> Option<Decimal> {
    if price_usd <= Decimal::ZERO || price_native <= Decimal::ZERO {
        return None;
    }
    price_usd.checked_div(price_native)
}
