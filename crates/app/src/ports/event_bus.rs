//! Event bus port — publish/subscribe for state and signal changes.

use std::future::Future;

use tokio::sync::broadcast;

use workshift_domain::error::WorkshiftError;
use workshift_domain::event::Event;

/// Publishes events to interested subscribers.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), WorkshiftError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), WorkshiftError>> + Send {
        (**self).publish(event)
    }
}

/// Hands out receivers for events published *after* the call.
///
/// Dropping the receiver unsubscribes.
pub trait EventSubscriber {
    fn subscribe(&self) -> broadcast::Receiver<Event>;
}

impl<T: EventSubscriber> EventSubscriber for std::sync::Arc<T> {
    fn subscribe(&self) -> broadcast::Receiver<Event> {
        (**self).subscribe()
    }
}
