//! Change detector.
//!
//! Each tick pulls a fresh aggregate, diffs it against the last broadcast
//! state and emits typed events through a [`ChangeEventSink`].

mod diff;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use log::{debug, info};
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use tokenpulse_market_data::AssetRecord;

use crate::aggregator::AggregatorServiceTrait;
use crate::events::{ChangeEvent, ChangeEventSink};

pub use diff::detect_changes;

#[derive(Clone, Debug)]
pub struct DetectorConfig {
    /// Records pulled per tick.
    pub sample_size: usize,
    /// Relative price move that counts as an update (0.05 = 5%).
    pub price_change_threshold: Decimal,
    /// Volume growth factor that counts as a spike.
    pub volume_spike_multiplier: Decimal,
    /// Keep only identities seen in the latest tick. Off by default: the
    /// state then grows with every distinct asset ever seen.
    pub bounded_snapshot: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            sample_size: 100,
            price_change_threshold: Decimal::new(5, 2),
            volume_spike_multiplier: Decimal::new(15, 1),
            bounded_snapshot: false,
        }
    }
}

pub struct ChangeDetector {
    aggregator: Arc<dyn AggregatorServiceTrait>,
    sink: Arc<dyn ChangeEventSink>,
    config: DetectorConfig,
    /// Last broadcast record per identity. Only `tick` writes it.
    last_seen: Mutex<HashMap<String, AssetRecord>>,
}

impl ChangeDetector {
    pub fn new(
        aggregator: Arc<dyn AggregatorServiceTrait>,
        sink: Arc<dyn ChangeEventSink>,
        config: DetectorConfig,
    ) -> Self {
        Self {
            aggregator,
            sink,
            config,
            last_seen: Mutex::new(HashMap::new()),
        }
    }

    /// Pull, diff, emit, then replace stored state with the current records.
    ///
    /// Returns the emitted events.
    pub async fn tick(&self) -> Vec<ChangeEvent> {
        let current = self.aggregator.aggregate(self.config.sample_size).await;

        let mut last_seen = self.last_seen.lock().await;
        let events = detect_changes(&last_seen, &current, &self.config, Utc::now());

        if self.config.bounded_snapshot {
            last_seen.clear();
        }
        for record in current {
            last_seen.insert(record.address.clone(), record);
        }
        let tracked = last_seen.len();
        drop(last_seen);

        if events.is_empty() {
            debug!("No changes detected across {} tracked tokens", tracked);
        } else {
            info!(
                "Detected {} changes across {} tracked tokens",
                events.len(),
                tracked
            );
            self.sink.emit_batch(events.clone());
        }
        events
    }

    /// Number of identities currently held in state.
    pub async fn tracked(&self) -> usize {
        self.last_seen.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Page, QueryFilter};
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::Mutex as StdMutex;

    use crate::events::RecordingSink;

    /// Aggregator returning scripted snapshots, one per call.
    struct ScriptedAggregator {
        snapshots: StdMutex<Vec<Vec<AssetRecord>>>,
        requested_limits: StdMutex<Vec<usize>>,
    }

    impl ScriptedAggregator {
        fn new(mut snapshots: Vec<Vec<AssetRecord>>) -> Arc<Self> {
            snapshots.reverse();
            Arc::new(Self {
                snapshots: StdMutex::new(snapshots),
                requested_limits: StdMutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl AggregatorServiceTrait for ScriptedAggregator {
        async fn aggregate(&self, limit: usize) -> Vec<AssetRecord> {
            self.requested_limits.lock().unwrap().push(limit);
            self.snapshots.lock().unwrap().pop().unwrap_or_default()
        }

        async fn search(&self, _query: &str, _limit: usize) -> Vec<AssetRecord> {
            Vec::new()
        }

        async fn get_filtered(&self, filter: &QueryFilter) -> Page {
            Page::empty(filter.limit)
        }

        async fn invalidate_all(&self) {}
    }

    fn record(address: &str, price: Decimal, volume: Decimal) -> AssetRecord {
        AssetRecord::new(address, address, address.to_uppercase(), price, "test")
            .with_volume(volume)
    }

    fn detector(
        snapshots: Vec<Vec<AssetRecord>>,
        config: DetectorConfig,
    ) -> (ChangeDetector, Arc<ScriptedAggregator>, RecordingSink) {
        let aggregator = ScriptedAggregator::new(snapshots);
        let sink = RecordingSink::default();
        let detector = ChangeDetector::new(aggregator.clone(), Arc::new(sink.clone()), config);
        (detector, aggregator, sink)
    }

    #[tokio::test]
    async fn test_first_tick_reports_everything_new() {
        let (detector, aggregator, sink) = detector(
            vec![vec![record("a", dec!(1), dec!(1)), record("b", dec!(2), dec!(2))]],
            DetectorConfig::default(),
        );

        let events = detector.tick().await;

        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.kind() == "new_asset"));
        assert_eq!(sink.len(), 2);
        assert_eq!(*aggregator.requested_limits.lock().unwrap(), vec![100]);
    }

    #[tokio::test]
    async fn test_successive_snapshots() {
        let (detector, _, sink) = detector(
            vec![
                vec![record("x", dec!(100), dec!(10)), record("z", dec!(1), dec!(1))],
                vec![
                    record("x", dec!(106), dec!(10)),
                    record("y", dec!(3), dec!(3)),
                    record("z", dec!(1), dec!(1)),
                ],
            ],
            DetectorConfig::default(),
        );

        detector.tick().await;
        sink.clear();
        let events = detector.tick().await;

        let summary: Vec<_> = events
            .iter()
            .map(|e| (e.kind(), e.record().address.as_str()))
            .collect();
        assert_eq!(summary, vec![("price_update", "x"), ("new_asset", "y")]);
        assert_eq!(sink.len(), 2);
    }

    #[tokio::test]
    async fn test_state_overwritten_each_tick() {
        let (detector, _, _) = detector(
            vec![
                vec![record("x", dec!(100), dec!(10))],
                vec![record("x", dec!(104), dec!(10))],
                vec![record("x", dec!(108), dec!(10))],
            ],
            DetectorConfig::default(),
        );

        detector.tick().await;
        // 4% then ~3.8%: each step compares to the previous tick only
        assert!(detector.tick().await.is_empty());
        assert!(detector.tick().await.is_empty());
    }

    #[tokio::test]
    async fn test_unbounded_state_keeps_departed_assets() {
        let (detector, _, _) = detector(
            vec![
                vec![record("a", dec!(1), dec!(1))],
                vec![record("b", dec!(1), dec!(1))],
                vec![record("a", dec!(1), dec!(1))],
            ],
            DetectorConfig::default(),
        );

        detector.tick().await;
        detector.tick().await;
        assert_eq!(detector.tracked().await, 2);

        // "a" is remembered, so it is not new again
        assert!(detector.tick().await.is_empty());
    }

    #[tokio::test]
    async fn test_bounded_state_drops_departed_assets() {
        let config = DetectorConfig {
            bounded_snapshot: true,
            ..DetectorConfig::default()
        };
        let (detector, _, _) = detector(
            vec![
                vec![record("a", dec!(1), dec!(1))],
                vec![record("b", dec!(1), dec!(1))],
                vec![record("a", dec!(1), dec!(1))],
            ],
            config,
        );

        detector.tick().await;
        detector.tick().await;
        assert_eq!(detector.tracked().await, 1);

        let events = detector.tick().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind(), "new_asset");
    }

    #[tokio::test]
    async fn test_empty_aggregate_emits_nothing() {
        let (detector, _, sink) = detector(vec![vec![]], DetectorConfig::default());
        assert!(detector.tick().await.is_empty());
        assert!(sink.is_empty());
    }
}
