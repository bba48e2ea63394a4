//! Event — an immutable record of something that happened.
//!
//! Events are produced when a published entity changes state and when an
//! external workday signal receives a new value.

use serde::{Deserialize, Serialize};

use crate::id::EventId;
use crate::time::{Timestamp, now};

/// Kind of event carried on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A published entity changed state. Data: `{"from": …, "to": …}`.
    StateChanged,
    /// An external signal received a value. Data: `{"state": …}`.
    SignalChanged,
}

/// A single bus event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub event_type: EventType,
    /// Entity or signal the event is about.
    pub entity_id: String,
    pub data: serde_json::Value,
    pub timestamp: Timestamp,
}

impl Event {
    /// Create an event stamped with the current time.
    #[must_use]
    pub fn new(event_type: EventType, entity_id: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            id: EventId::new(),
            event_type,
            entity_id: entity_id.into(),
            data,
            timestamp: now(),
        }
    }

    /// Whether this is a signal change for one of `signal_ids`.
    #[must_use]
    pub fn is_signal_change_for(&self, signal_ids: &[String]) -> bool {
        self.event_type == EventType::SignalChanged
            && signal_ids.iter().any(|id| *id == self.entity_id)
    }
}
