//! Merge engine: reconcile per-provider records into one record per asset.
//!
//! Records are folded left to right in the order they arrive, which is the
//! registry's provider order. Per identity:
//!
//! | Field                         | Rule                         |
//! |-------------------------------|------------------------------|
//! | price                         | first non-zero value wins    |
//! | market cap, volume, liquidity | maximum observed             |
//! | transaction count             | maximum observed             |
//! | percentage changes            | first non-zero value wins    |
//! | name, ticker, protocol        | first non-empty value wins   |
//! | last updated                  | merge time                   |
//! | sources                       | ordered union                |
//!
//! Output order is first-seen order of each identity.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::AssetRecord;

/// Merge records, stamping every output record with the current time.
pub fn merge_records(records: Vec<AssetRecord>) -> Vec<AssetRecord> {
    merge_records_at(records, Utc::now())
}

/// Merge records, stamping every output record with `now`.
///
/// Deterministic for a fixed input order and `now`.
pub fn merge_records_at(records: Vec<AssetRecord>, now: DateTime<Utc>) -> Vec<AssetRecord> {
    let mut merged: Vec<AssetRecord> = Vec::with_capacity(records.len());
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(records.len());

    for record in records {
        match positions.get(&record.address).copied() {
            Some(idx) => absorb(&mut merged[idx], record),
            None => {
                positions.insert(record.address.clone(), merged.len());
                merged.push(normalize(record));
            }
        }
    }

    for record in &mut merged {
        record.last_updated = now;
    }
    merged
}

fn normalize(mut record: AssetRecord) -> AssetRecord {
    let mut sources = Vec::with_capacity(record.sources.len());
    for source in record.sources.drain(..) {
        if !sources.contains(&source) {
            sources.push(source);
        }
    }
    record.sources = sources;
    record
}

fn absorb(target: &mut AssetRecord, incoming: AssetRecord) {
    first_non_zero(&mut target.price, incoming.price);
    first_non_zero(&mut target.price_change_1h, incoming.price_change_1h);
    first_non_zero(&mut target.price_change_24h, incoming.price_change_24h);
    first_non_zero(&mut target.price_change_7d, incoming.price_change_7d);

    target.market_cap = target.market_cap.max(incoming.market_cap);
    target.volume = target.volume.max(incoming.volume);
    target.liquidity = target.liquidity.max(incoming.liquidity);
    target.transaction_count = target.transaction_count.max(incoming.transaction_count);

    first_non_empty(&mut target.name, incoming.name);
    first_non_empty(&mut target.ticker, incoming.ticker);
    first_non_empty(&mut target.protocol, incoming.protocol);

    for source in incoming.sources {
        if !target.sources.contains(&source) {
            target.sources.push(source);
        }
    }
}

fn first_non_zero(target: &mut Decimal, incoming: Decimal) {
    if target.is_zero() && !incoming.is_zero() {
        *target = incoming;
    }
}

fn first_non_empty(target: &mut String, incoming: String) {
    if target.is_empty() && !incoming.is_empty() {
        *target = incoming;
    }
}
