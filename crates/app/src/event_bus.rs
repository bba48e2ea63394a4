//! In-process event bus backed by a tokio broadcast channel.

use std::future::Future;

use tokio::sync::broadcast;

use workshift_domain::error::WorkshiftError;
use workshift_domain::event::Event;

use crate::ports::{EventPublisher, EventSubscriber};

/// Default channel capacity used by the daemon.
pub const DEFAULT_CAPACITY: usize = 256;

/// In-process event bus using a tokio [`broadcast`] channel.
///
/// Publishing succeeds even when there are no active subscribers
/// (the event is simply dropped).
pub struct InProcessEventBus {
    sender: broadcast::Sender<Event>,
}

impl InProcessEventBus {
    /// Create a new event bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }
}

impl EventSubscriber for InProcessEventBus {
    /// Returns a receiver that will get all events published *after*
    /// the subscription is created.
    fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }
}

impl Default for InProcessEventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventPublisher for InProcessEventBus {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), WorkshiftError>> + Send {
        // send only fails with zero receivers
        if let Err(err) = self.sender.send(event) {
            tracing::trace!(entity_id = %err.0.entity_id, "event dropped, no subscribers");
        }
        async { Ok(()) }
    }
}
