//! Shift code of a day relative to today.

use std::sync::Arc;

use chrono::Days;

use workshift_domain::entity::EntityState;
use workshift_domain::id::EntryId;
use workshift_domain::schedule::{ScheduleConfig, SignalSnapshot};
use workshift_domain::time::{Timestamp, next_local_midnight};

use super::{Attributes, EntityNaming, Evaluation, Observer, instant_attribute};

/// Numeric sensor: shift code for `today + offset`, `0` for no shift.
///
/// Attributes `shift_start` and `shift_end` hold RFC 3339 UTC instants or
/// `null`. The value can only change at local midnight or when a workday
/// signal changes.
pub struct DaySensor {
    schedule: Arc<ScheduleConfig>,
    naming: EntityNaming,
    offset: u32,
}

impl DaySensor {
    #[must_use]
    pub fn new(entry_id: EntryId, schedule: Arc<ScheduleConfig>, offset: u32) -> Self {
        let (suffix, label) = match offset {
            0 => ("today".to_string(), "Today".to_string()),
            1 => ("tomorrow".to_string(), "Tomorrow".to_string()),
            n => (format!("day_{n}"), format!("Day {n}")),
        };
        let naming = EntityNaming::new(entry_id, schedule.name(), "sensor", &suffix, &label);
        Self {
            schedule,
            naming,
            offset,
        }
    }

    #[must_use]
    pub fn today(entry_id: EntryId, schedule: Arc<ScheduleConfig>) -> Self {
        Self::new(entry_id, schedule, 0)
    }

    #[must_use]
    pub fn tomorrow(entry_id: EntryId, schedule: Arc<ScheduleConfig>) -> Self {
        Self::new(entry_id, schedule, 1)
    }
}

impl Observer for DaySensor {
    fn entity_id(&self) -> &str {
        &self.naming.entity_id
    }

    fn schedule(&self) -> &ScheduleConfig {
        &self.schedule
    }

    fn evaluate(&self, now: Timestamp, signals: &SignalSnapshot) -> Evaluation {
        let today = self.schedule.local_date(now);
        let occurrence = today
            .checked_add_days(Days::new(u64::from(self.offset)))
            .and_then(|target| self.schedule.resolver(today, signals).resolve(target));

        let code = occurrence.as_ref().map_or(0, |occ| i64::from(occ.code));
        let mut attributes = Attributes::new();
        attributes.insert(
            "shift_start".into(),
            instant_attribute(occurrence.as_ref().map(|occ| occ.start_utc())),
        );
        attributes.insert(
            "shift_end".into(),
            instant_attribute(occurrence.as_ref().map(|occ| occ.end_utc())),
        );

        Evaluation {
            update: self
                .naming
                .update(EntityState::Numeric(code), attributes, now),
            next_wake: next_local_midnight(now, self.schedule.time_zone()),
        }
    }
}
