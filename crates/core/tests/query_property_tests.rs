//! Property-based integration tests for merging, querying and change detection.
//!
//! These tests check invariants that must hold for any provider output,
//! using the `proptest` crate for random test case generation.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use tokenpulse_core::detector::{detect_changes, DetectorConfig};
use tokenpulse_core::query::{run_query, QueryFilter, SortKey, SortOrder};
use tokenpulse_market_data::{merge_records_at, AssetRecord};

// =============================================================================
// Generators
// =============================================================================

fn arb_source() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("dexscreener"), Just("geckoterminal"), Just("jupiter")]
}

fn arb_sort_key() -> impl Strategy<Value = SortKey> {
    prop_oneof![
        Just(SortKey::Volume),
        Just(SortKey::PriceChange),
        Just(SortKey::MarketCap),
        Just(SortKey::Liquidity),
    ]
}

fn arb_sort_order() -> impl Strategy<Value = SortOrder> {
    prop_oneof![Just(SortOrder::Asc), Just(SortOrder::Desc)]
}

/// Generates a record. Addresses come from a small pool so that
/// contributions for the same asset collide often.
fn arb_record() -> impl Strategy<Value = AssetRecord> {
    (
        "[a-f]",           // address
        "[A-Za-z]{0,6}",   // name
        0u32..1_000,       // price
        0u64..10_000,      // volume
        0u64..10_000,      // market cap
        0u64..10_000,      // liquidity
        -50i64..50,        // 1h change
        arb_source(),
    )
        .prop_map(
            |(address, name, price, volume, market_cap, liquidity, change, source)| {
                AssetRecord::new(
                    address.clone(),
                    name,
                    address.to_uppercase(),
                    Decimal::from(price),
                    source,
                )
                .with_volume(Decimal::from(volume))
                .with_market_cap(Decimal::from(market_cap))
                .with_liquidity(Decimal::from(liquidity))
                .with_price_changes(Decimal::from(change), Decimal::ZERO, Decimal::ZERO)
            },
        )
}

fn arb_records(max_count: usize) -> impl Strategy<Value = Vec<AssetRecord>> {
    proptest::collection::vec(arb_record(), 0..=max_count)
}

fn fixed_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Merging yields one record per identity, in first-seen order.
    #[test]
    fn prop_merge_yields_unique_identities_in_first_seen_order(
        records in arb_records(40)
    ) {
        let mut expected = Vec::new();
        for record in &records {
            if !expected.contains(&record.address) {
                expected.push(record.address.clone());
            }
        }

        let merged = merge_records_at(records, fixed_now());
        let actual: Vec<_> = merged.iter().map(|r| r.address.clone()).collect();

        prop_assert_eq!(actual, expected);
    }

    /// Merging an already merged set changes nothing.
    #[test]
    fn prop_merge_is_idempotent(records in arb_records(40)) {
        let once = merge_records_at(records, fixed_now());
        let twice = merge_records_at(once.clone(), fixed_now());
        prop_assert_eq!(once, twice);
    }

    /// Additive fields take the largest contribution for each identity.
    #[test]
    fn prop_merge_keeps_max_volume(records in arb_records(40)) {
        let mut max_volume: HashMap<String, Decimal> = HashMap::new();
        for record in &records {
            let entry = max_volume.entry(record.address.clone()).or_insert(Decimal::ZERO);
            *entry = (*entry).max(record.volume);
        }

        for merged in merge_records_at(records, fixed_now()) {
            prop_assert_eq!(Some(&merged.volume), max_volume.get(&merged.address));
        }
    }

    /// Following cursors visits every matching record exactly once, in order.
    #[test]
    fn prop_cursor_walk_covers_filtered_set(
        records in arb_records(60),
        limit in 1usize..8,
        min_volume in proptest::option::of(0u64..10_000),
        sort_by in arb_sort_key(),
        sort_order in arb_sort_order(),
    ) {
        let merged = merge_records_at(records, fixed_now());
        let mut filter = QueryFilter::default()
            .with_sort(sort_by, sort_order)
            .with_limit(limit);
        filter.min_volume = min_volume.map(Decimal::from);

        let first = run_query(merged.clone(), &filter);
        let total = first.pagination.total;

        let mut seen = Vec::new();
        let mut page = first;
        loop {
            prop_assert!(page.data.len() <= limit);
            prop_assert_eq!(page.pagination.total, total);
            seen.extend(page.data.iter().cloned());
            match page.pagination.next_cursor.clone() {
                Some(cursor) => {
                    page = run_query(merged.clone(), &filter.clone().with_cursor(cursor));
                }
                None => break,
            }
        }

        prop_assert_eq!(seen.len(), total);
        let unique: HashSet<_> = seen.iter().map(|r| r.address.clone()).collect();
        prop_assert_eq!(unique.len(), total);

        if let Some(min) = filter.min_volume {
            prop_assert!(seen.iter().all(|r| r.volume >= min));
        }

        let keys: Vec<Decimal> = seen
            .iter()
            .map(|r| match sort_by {
                SortKey::Volume => r.volume,
                SortKey::PriceChange => r.price_change_1h,
                SortKey::MarketCap => r.market_cap,
                SortKey::Liquidity => r.liquidity,
            })
            .collect();
        let ordered = keys.windows(2).all(|w| match sort_order {
            SortOrder::Asc => w[0] <= w[1],
            SortOrder::Desc => w[0] >= w[1],
        });
        prop_assert!(ordered, "page sequence is not sorted: {:?}", keys);
    }

    /// A snapshot compared against itself produces no events.
    #[test]
    fn prop_unchanged_snapshot_is_quiet(records in arb_records(40)) {
        let merged = merge_records_at(records, fixed_now());
        let state: HashMap<String, AssetRecord> = merged
            .iter()
            .map(|r| (r.address.clone(), r.clone()))
            .collect();

        let events = detect_changes(&state, &merged, &DetectorConfig::default(), fixed_now());
        prop_assert!(events.is_empty());
    }

    /// Against empty state every identity is new, exactly once.
    #[test]
    fn prop_empty_state_reports_every_identity(records in arb_records(40)) {
        let merged = merge_records_at(records, fixed_now());
        let events = detect_changes(&HashMap::new(), &merged, &DetectorConfig::default(), fixed_now());

        prop_assert_eq!(events.len(), merged.len());
        prop_assert!(events.iter().all(|e| e.kind() == "new_asset"));
    }
}
