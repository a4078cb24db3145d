//! Search relevance ordering.

use std::cmp::Ordering;

use tokenpulse_market_data::AssetRecord;

/// Relevance tier of a record for a query. Lower ranks first.
fn tier(record: &AssetRecord, needle: &str) -> u8 {
    if record.name.to_lowercase().contains(needle) {
        0
    } else if record.ticker.to_lowercase().contains(needle) {
        1
    } else {
        2
    }
}

/// Order search results: name matches, then ticker matches, then the rest.
/// Within a tier records are ordered by descending volume.
pub fn rank_search_results(records: &mut [AssetRecord], query: &str) {
    let needle = query.trim().to_lowercase();
    records.sort_by(|a, b| match tier(a, &needle).cmp(&tier(b, &needle)) {
        Ordering::Equal => b.volume.cmp(&a.volume),
        other => other,
    });
}
