//! Filter, sort and paginate a merged record set.
//!
//! Sorting is stable: records with equal keys keep their input order.
//! `time_period` is accepted but has no effect, as records carry no history.

use std::cmp::Ordering;

use log::warn;
use rust_decimal::Decimal;

use tokenpulse_market_data::AssetRecord;

use super::cursor::{decode_cursor, encode_cursor};
use super::filter::{QueryFilter, SortKey, SortOrder};
use super::page::{Page, PageInfo};

/// Apply a full query: filter, then sort, then paginate.
pub fn run_query(records: Vec<AssetRecord>, filter: &QueryFilter) -> Page {
    let mut filtered = apply_filters(records, filter);
    sort_records(&mut filtered, filter.sort_by, filter.sort_order);
    paginate(filtered, filter.limit, filter.cursor.as_deref())
}

/// Keep records meeting the minimum volume and market cap thresholds.
pub fn apply_filters(records: Vec<AssetRecord>, filter: &QueryFilter) -> Vec<AssetRecord> {
    records
        .into_iter()
        .filter(|r| filter.min_volume.map_or(true, |min| r.volume >= min))
        .filter(|r| filter.min_market_cap.map_or(true, |min| r.market_cap >= min))
        .collect()
}

fn sort_value(record: &AssetRecord, key: SortKey) -> Decimal {
    match key {
        SortKey::Volume => record.volume,
        SortKey::PriceChange => record.price_change_1h,
        SortKey::MarketCap => record.market_cap,
        SortKey::Liquidity => record.liquidity,
    }
}

pub fn sort_records(records: &mut [AssetRecord], key: SortKey, order: SortOrder) {
    records.sort_by(|a, b| {
        let ord: Ordering = sort_value(a, key).cmp(&sort_value(b, key));
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
}

/// Cut one page starting at the cursor's offset.
///
/// An unreadable cursor restarts from the first page. A page size of zero
/// is treated as one.
pub fn paginate(records: Vec<AssetRecord>, limit: usize, cursor: Option<&str>) -> Page {
    let limit = limit.max(1);
    let total = records.len();

    let offset = match cursor.filter(|c| !c.trim().is_empty()) {
        Some(cursor) => decode_cursor(cursor).unwrap_or_else(|e| {
            warn!("Invalid cursor provided, starting from beginning: {}", e);
            0
        }),
        None => 0,
    };

    let end = offset.saturating_add(limit);
    let data: Vec<AssetRecord> = records.into_iter().skip(offset).take(limit).collect();
    let next_cursor = (end < total).then(|| encode_cursor(end));

    Page {
        data,
        pagination: PageInfo {
            limit,
            next_cursor,
            total,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(address: &str, volume: Decimal, market_cap: Decimal) -> AssetRecord {
        AssetRecord::new(address, address, address, dec!(1), "test")
            .with_volume(volume)
            .with_market_cap(market_cap)
    }

    fn sample() -> Vec<AssetRecord> {
        (0..25)
            .map(|i| record(&format!("t{:02}", i), Decimal::from(i * 10), Decimal::from(i)))
            .collect()
    }

    fn addresses(records: &[AssetRecord]) -> Vec<String> {
        records.iter().map(|r| r.address.clone()).collect()
    }

    #[test]
    fn test_min_volume_filter() {
        let filter = QueryFilter::default().with_min_volume(dec!(100));
        let filtered = apply_filters(sample(), &filter);

        assert_eq!(filtered.len(), 15);
        assert!(filtered.iter().all(|r| r.volume >= dec!(100)));
    }

    #[test]
    fn test_min_market_cap_filter() {
        let filter = QueryFilter::default()
            .with_min_volume(dec!(50))
            .with_min_market_cap(dec!(20));
        let filtered = apply_filters(sample(), &filter);

        assert_eq!(addresses(&filtered), vec!["t20", "t21", "t22", "t23", "t24"]);
    }

    #[test]
    fn test_sort_directions() {
        let mut records = sample();
        sort_records(&mut records, SortKey::MarketCap, SortOrder::Desc);
        assert_eq!(records[0].address, "t24");

        sort_records(&mut records, SortKey::Volume, SortOrder::Asc);
        assert_eq!(records[0].address, "t00");
    }

    #[test]
    fn test_sort_price_change_uses_one_hour() {
        let mut records = vec![
            record("a", dec!(1), dec!(1)).with_price_changes(dec!(-3), dec!(50), dec!(0)),
            record("b", dec!(1), dec!(1)).with_price_changes(dec!(8), dec!(-5), dec!(0)),
        ];
        sort_records(&mut records, SortKey::PriceChange, SortOrder::Desc);
        assert_eq!(addresses(&records), vec!["b", "a"]);
    }

    #[test]
    fn test_sort_keeps_tie_order() {
        let mut records = vec![
            record("first", dec!(5), dec!(0)),
            record("second", dec!(5), dec!(0)),
            record("big", dec!(9), dec!(0)),
        ];
        sort_records(&mut records, SortKey::Volume, SortOrder::Desc);
        assert_eq!(addresses(&records), vec!["big", "first", "second"]);
    }

    #[test]
    fn test_following_cursors_reproduces_sequence() {
        let mut expected = sample();
        sort_records(&mut expected, SortKey::Volume, SortOrder::Desc);

        let mut collected = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let filter = QueryFilter {
                limit: 7,
                cursor: cursor.clone(),
                ..QueryFilter::default()
            };
            let page = run_query(sample(), &filter);
            assert_eq!(page.pagination.total, 25);
            collected.extend(page.data);
            match page.pagination.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        assert_eq!(addresses(&collected), addresses(&expected));
    }

    #[test]
    fn test_no_cursor_on_last_page() {
        let page = paginate(sample(), 25, None);
        assert_eq!(page.data.len(), 25);
        assert_eq!(page.pagination.next_cursor, None);
    }

    #[test]
    fn test_invalid_cursor_falls_back_to_first_page() {
        let first = paginate(sample(), 5, None);
        for bad in ["%%%not-base64%%%", "aGVsbG8=", "e30=", ""] {
            let page = paginate(sample(), 5, Some(bad));
            assert_eq!(page, first, "cursor {:?}", bad);
        }
    }

    #[test]
    fn test_offset_past_end_is_empty() {
        let page = paginate(sample(), 5, Some(&encode_cursor(100)));
        assert!(page.data.is_empty());
        assert_eq!(page.pagination.next_cursor, None);
        assert_eq!(page.pagination.total, 25);
    }

    #[test]
    fn test_zero_limit_is_one() {
        let page = paginate(sample(), 0, None);
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.pagination.limit, 1);
    }
}
