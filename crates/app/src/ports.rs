//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They live here so that observers and adapters can both depend on them
//! without creating circular dependencies.

pub mod clock;
pub mod event_bus;

pub use clock::{Clock, SystemClock};
pub use event_bus::{EventPublisher, EventSubscriber};
