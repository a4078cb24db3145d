//! Topic-keyed publish/subscribe hub and the sink the detector emits into.

use std::sync::Arc;

use dashmap::DashMap;
use log::debug;
use tokio::sync::broadcast;

use super::{ChangeEvent, TOKEN_UPDATES_TOPIC};

/// Destination for detected changes.
///
/// `emit` must not block; delivery is best effort with no replay.
pub trait ChangeEventSink: Send + Sync {
    fn emit(&self, event: ChangeEvent);

    /// Emit in order. Defaults to one `emit` per event.
    fn emit_batch(&self, events: Vec<ChangeEvent>) {
        for event in events {
            self.emit(event);
        }
    }
}

/// Default per-topic buffer. Subscribers further behind than this skip ahead.
pub const DEFAULT_TOPIC_CAPACITY: usize = 256;

/// Broadcast hub fanning events out to every subscriber of a topic.
///
/// Joining a group is `subscribe`; leaving is dropping the receiver.
/// Publishing to a topic nobody listens to is not an error.
pub struct BroadcastHub {
    capacity: usize,
    topics: DashMap<String, broadcast::Sender<ChangeEvent>>,
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new(DEFAULT_TOPIC_CAPACITY)
    }
}

impl BroadcastHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            topics: DashMap::new(),
        }
    }

    fn sender(&self, topic: &str) -> broadcast::Sender<ChangeEvent> {
        self.topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }

    pub fn subscribe(&self, topic: &str) -> broadcast::Receiver<ChangeEvent> {
        self.sender(topic).subscribe()
    }

    /// Publish to every current subscriber. Returns how many received it.
    pub fn publish(&self, topic: &str, event: ChangeEvent) -> usize {
        let Some(sender) = self.topics.get(topic).map(|s| s.clone()) else {
            return 0;
        };
        // No receivers is fine
        sender.send(event).unwrap_or(0)
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics
            .get(topic)
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }
}

/// Sink publishing every event to one hub topic.
pub struct TopicSink {
    hub: Arc<BroadcastHub>,
    topic: String,
}

impl TopicSink {
    pub fn new(hub: Arc<BroadcastHub>, topic: impl Into<String>) -> Self {
        Self {
            hub,
            topic: topic.into(),
        }
    }

    /// Sink for the shared token updates topic.
    pub fn token_updates(hub: Arc<BroadcastHub>) -> Self {
        Self::new(hub, TOKEN_UPDATES_TOPIC)
    }
}

impl ChangeEventSink for TopicSink {
    fn emit(&self, event: ChangeEvent) {
        let kind = event.kind();
        let ticker = event.record().ticker.clone();
        let delivered = self.hub.publish(&self.topic, event);
        debug!(
            "Broadcasted {} for token {} to {} subscribers",
            kind, ticker, delivered
        );
    }
}

/// Sink that keeps every event in memory.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct RecordingSink {
    events: Arc<std::sync::Mutex<Vec<ChangeEvent>>>,
}

#[cfg(test)]
impl RecordingSink {
    pub(crate) fn events(&self) -> Vec<ChangeEvent> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
impl ChangeEventSink for RecordingSink {
    fn emit(&self, event: ChangeEvent) {
        self.events.lock().unwrap().push(event);
    }
}
