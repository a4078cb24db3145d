//! Change events module.
//!
//! Provides change event types, the sink trait the detector emits through,
//! and the topic hub that fans events out to subscribers. Runtime adapters
//! (the SSE endpoint) subscribe to the hub.

mod change_event;
mod hub;

pub use change_event::*;
pub use hub::{BroadcastHub, ChangeEventSink, TopicSink, DEFAULT_TOPIC_CAPACITY};

#[cfg(test)]
pub(crate) use hub::RecordingSink;
