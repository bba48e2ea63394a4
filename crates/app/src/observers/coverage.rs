//! "On shift" binary sensor.

use std::sync::Arc;

use workshift_domain::entity::{AttributeValue, EntityState};
use workshift_domain::id::EntryId;
use workshift_domain::schedule::{DEFAULT_SEARCH_HORIZON_DAYS, ScheduleConfig, SignalSnapshot};
use workshift_domain::time::{Timestamp, next_local_midnight};

use super::{Attributes, EntityNaming, Evaluation, Observer, instant_attribute};

/// `on` while a shift is in progress.
///
/// Attributes: `shift_code`, `start`, `end` (all `null` when off).
pub struct CoverageSensor {
    schedule: Arc<ScheduleConfig>,
    naming: EntityNaming,
}

impl CoverageSensor {
    #[must_use]
    pub fn new(entry_id: EntryId, schedule: Arc<ScheduleConfig>) -> Self {
        let naming = EntityNaming::new(
            entry_id,
            schedule.name(),
            "binary_sensor",
            "on_shift",
            "On Shift",
        );
        Self { schedule, naming }
    }
}

impl Observer for CoverageSensor {
    fn entity_id(&self) -> &str {
        &self.naming.entity_id
    }

    fn schedule(&self) -> &ScheduleConfig {
        &self.schedule
    }

    fn evaluate(&self, now: Timestamp, signals: &SignalSnapshot) -> Evaluation {
        let today = self.schedule.local_date(now);
        let resolver = self.schedule.resolver(today, signals);
        let midnight = next_local_midnight(now, self.schedule.time_zone());

        let mut attributes = Attributes::new();
        let (state, boundary) = match resolver.shift_covering(now) {
            Some(occ) => {
                attributes.insert("shift_code".into(), AttributeValue::Int(i64::from(occ.code)));
                attributes.insert("start".into(), instant_attribute(Some(occ.start_utc())));
                attributes.insert("end".into(), instant_attribute(Some(occ.end_utc())));
                (EntityState::On, Some(occ.end_utc()))
            }
            None => {
                attributes.insert("shift_code".into(), AttributeValue::Null);
                attributes.insert("start".into(), AttributeValue::Null);
                attributes.insert("end".into(), AttributeValue::Null);
                let next = resolver
                    .next_shift_after(now, DEFAULT_SEARCH_HORIZON_DAYS)
                    .map(|occ| occ.start_utc());
                (EntityState::Off, next)
            }
        };

        Evaluation {
            update: self.naming.update(state, attributes, now),
            next_wake: boundary.map_or(midnight, |at| at.min(midnight)),
        }
    }
}
