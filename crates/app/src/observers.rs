//! Observers — entities that mirror a schedule's state.
//!
//! Every observer is a pure [`Observer::evaluate`] step (state at an instant
//! plus the next instant it could change) driven by [`run_observer`], which
//! publishes the state, sleeps until that instant and repeats. Observers of a
//! schedule with a workday override also wake up when a watched signal
//! changes.

mod calendar;
mod coverage;
mod day;
mod runner;

pub use calendar::{CalendarEvent, CalendarObserver};
pub use coverage::CoverageSensor;
pub use day::DaySensor;
pub use runner::run_observer;

use std::collections::BTreeMap;
use std::sync::Arc;

use workshift_domain::entity::{AttributeValue, EntityState, slugify};
use workshift_domain::id::EntryId;
use workshift_domain::schedule::{ScheduleConfig, SignalSnapshot};
use workshift_domain::time::Timestamp;

use crate::registry::EntityUpdate;

/// Integration name used in calendar descriptions.
pub const INTEGRATION_NAME: &str = "workshift";

/// Result of one evaluation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub update: EntityUpdate,
    /// Earliest instant at which the state may differ.
    pub next_wake: Timestamp,
}

/// An entity computed from a schedule.
pub trait Observer: Send + Sync + 'static {
    fn entity_id(&self) -> &str;

    fn schedule(&self) -> &ScheduleConfig;

    /// Compute the state at `now` using an immutable signal snapshot.
    fn evaluate(&self, now: Timestamp, signals: &SignalSnapshot) -> Evaluation;
}

impl<T: Observer> Observer for Arc<T> {
    fn entity_id(&self) -> &str {
        (**self).entity_id()
    }

    fn schedule(&self) -> &ScheduleConfig {
        (**self).schedule()
    }

    fn evaluate(&self, now: Timestamp, signals: &SignalSnapshot) -> Evaluation {
        (**self).evaluate(now, signals)
    }
}

/// Ids and display name of one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityNaming {
    pub entity_id: String,
    pub unique_id: String,
    pub friendly_name: String,
}

impl EntityNaming {
    /// `<platform>.<slug>_<suffix>`, `<entry>_<suffix>`, `<name> <label>`.
    #[must_use]
    pub fn new(
        entry_id: EntryId,
        schedule_name: &str,
        platform: &str,
        suffix: &str,
        label: &str,
    ) -> Self {
        Self {
            entity_id: format!("{platform}.{}_{suffix}", slugify(schedule_name)),
            unique_id: format!("{entry_id}_{suffix}"),
            friendly_name: format!("{schedule_name} {label}"),
        }
    }

    fn update(&self, state: EntityState, attributes: Attributes, at: Timestamp) -> EntityUpdate {
        EntityUpdate {
            entity_id: self.entity_id.clone(),
            unique_id: self.unique_id.clone(),
            friendly_name: self.friendly_name.clone(),
            state,
            attributes,
            at,
        }
    }
}

type Attributes = BTreeMap<String, AttributeValue>;

/// RFC 3339 UTC rendering used for instant attributes.
fn instant_attribute(instant: Option<Timestamp>) -> AttributeValue {
    AttributeValue::optional_string(instant.map(|ts| ts.to_rfc3339()))
}
