use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use tokenpulse_market_data::AssetRecord;

use super::DetectorConfig;
use crate::events::ChangeEvent;

/// Relative price move from `previous` to `current`.
///
/// `None` when the previous price is zero or the ratio overflows.
pub(crate) fn relative_price_change(previous: Decimal, current: Decimal) -> Option<Decimal> {
    if previous.is_zero() {
        return None;
    }
    current
        .checked_sub(previous)
        .and_then(|delta| delta.abs().checked_div(previous.abs()))
}

fn price_moved(previous: &AssetRecord, current: &AssetRecord, threshold: Decimal) -> bool {
    match relative_price_change(previous.price, current.price) {
        Some(change) => change > threshold,
        None => !current.price.is_zero(),
    }
}

/// A prior volume too large to scale can't be exceeded by a spike.
fn volume_spiked(previous: &AssetRecord, current: &AssetRecord, multiplier: Decimal) -> bool {
    previous
        .volume
        .checked_mul(multiplier)
        .map_or(false, |limit| current.volume > limit)
}

/// Events for `current` against the last broadcast `previous` state.
///
/// Emits in `current` order. Price and volume checks are independent, so
/// one record may yield both a price update and a volume spike.
pub fn detect_changes(
    previous: &HashMap<String, AssetRecord>,
    current: &[AssetRecord],
    config: &DetectorConfig,
    now: DateTime<Utc>,
) -> Vec<ChangeEvent> {
    let mut events = Vec::new();

    for record in current {
        let Some(prior) = previous.get(&record.address) else {
            events.push(ChangeEvent::new_asset(record.clone(), now));
            continue;
        };

        if price_moved(prior, record, config.price_change_threshold) {
            events.push(ChangeEvent::price_update(record.clone(), now));
        }
        if volume_spiked(prior, record, config.volume_spike_multiplier) {
            events.push(ChangeEvent::volume_spike(record.clone(), now));
        }
    }

    events
}
