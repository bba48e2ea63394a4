//! Shared application state for axum handlers.

use std::sync::Arc;

use workshift_app::ports::{Clock, EventPublisher, EventSubscriber, SystemClock};
use workshift_app::registry::StateRegistry;

/// Application state shared across all axum handlers.
///
/// `Clone` is implemented manually so the publisher type does not need to be
/// `Clone`; only the `Arc` and the clock handle are cloned.
pub struct AppState<EP, C = SystemClock> {
    /// Published entities, workday signals and calendars.
    pub registry: Arc<StateRegistry<EP>>,
    /// "Now" for queries evaluated on request, e.g. calendar ranges.
    pub clock: C,
}

impl<EP, C: Clone> Clone for AppState<EP, C> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            clock: self.clock.clone(),
        }
    }
}

impl<EP, C> AppState<EP, C>
where
    EP: EventPublisher + EventSubscriber + Send + Sync + 'static,
    C: Clock + Clone + Send + Sync + 'static,
{
    pub fn new(registry: StateRegistry<EP>, clock: C) -> Self {
        Self::from_arc(Arc::new(registry), clock)
    }

    /// Share a registry the observers already publish into.
    ///
    /// Pass the clock the observers run on so range queries and published
    /// states agree on which day is today.
    pub fn from_arc(registry: Arc<StateRegistry<EP>>, clock: C) -> Self {
        Self { registry, clock }
    }
}
