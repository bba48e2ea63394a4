//! Calendar view of a schedule.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use serde::{Serialize, Serializer};

use workshift_domain::entity::{AttributeValue, EntityState};
use workshift_domain::id::EntryId;
use workshift_domain::schedule::{
    DEFAULT_SEARCH_HORIZON_DAYS, ScheduleConfig, ShiftOccurrence, SignalSnapshot,
};
use workshift_domain::time::{Timestamp, next_local_midnight};

use super::{Attributes, EntityNaming, Evaluation, INTEGRATION_NAME, Observer};

const LOCAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One shift rendered as a calendar event.
///
/// Bounds serialize as RFC 3339 with a numeric offset, `+00:00` included,
/// matching the instant attributes of the other entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    pub summary: String,
    #[serde(serialize_with = "rfc3339")]
    pub start: DateTime<FixedOffset>,
    #[serde(serialize_with = "rfc3339")]
    pub end: DateTime<FixedOffset>,
    pub description: String,
}

fn rfc3339<S: Serializer>(instant: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&instant.to_rfc3339())
}

/// Calendar entity: the current or next shift, plus range queries.
pub struct CalendarObserver {
    schedule: Arc<ScheduleConfig>,
    naming: EntityNaming,
}

impl CalendarObserver {
    #[must_use]
    pub fn new(entry_id: EntryId, schedule: Arc<ScheduleConfig>) -> Self {
        let naming = EntityNaming::new(entry_id, schedule.name(), "calendar", "schedule", "Schedule");
        Self { schedule, naming }
    }

    /// Shift in progress at `now`, otherwise the next one.
    #[must_use]
    pub fn current_event(&self, now: Timestamp, signals: &SignalSnapshot) -> Option<ShiftOccurrence> {
        let resolver = self.schedule.resolver(self.schedule.local_date(now), signals);
        resolver
            .shift_covering(now)
            .or_else(|| resolver.next_shift_after(now, DEFAULT_SEARCH_HORIZON_DAYS))
    }

    /// Every shift overlapping `[start, end)`, evaluated as of `now`.
    #[must_use]
    pub fn events_between(
        &self,
        start: Timestamp,
        end: Timestamp,
        now: Timestamp,
        signals: &SignalSnapshot,
    ) -> Vec<CalendarEvent> {
        self.schedule
            .resolver(self.schedule.local_date(now), signals)
            .occurrences_between(start, end)
            .iter()
            .map(|occ| self.to_event(occ))
            .collect()
    }

    fn to_event(&self, occ: &ShiftOccurrence) -> CalendarEvent {
        CalendarEvent {
            summary: self.schedule.shift_name(occ.code),
            start: occ.start.fixed_offset(),
            end: occ.end.fixed_offset(),
            description: self.description(occ.rotation_index),
        }
    }

    fn description(&self, rotation_index: usize) -> String {
        format!(
            "Integration: {INTEGRATION_NAME}\nSchedule: {}\nRotation index: {rotation_index}",
            self.schedule.pattern()
        )
    }
}

impl Observer for CalendarObserver {
    fn entity_id(&self) -> &str {
        &self.naming.entity_id
    }

    fn schedule(&self) -> &ScheduleConfig {
        &self.schedule
    }

    fn evaluate(&self, now: Timestamp, signals: &SignalSnapshot) -> Evaluation {
        let midnight = next_local_midnight(now, self.schedule.time_zone());
        let current = self.current_event(now, signals);

        let mut attributes = Attributes::new();
        attributes.insert(
            "schedule".into(),
            AttributeValue::String(self.schedule.pattern().to_string()),
        );
        attributes.insert(
            "schedule_start".into(),
            AttributeValue::String(self.schedule.base_date().to_string()),
        );

        let (state, boundary) = match &current {
            Some(occ) => {
                let event = self.to_event(occ);
                let active = occ.covers(now);
                attributes.insert("message".into(), AttributeValue::String(event.summary));
                attributes.insert(
                    "start_time".into(),
                    AttributeValue::String(occ.start.format(LOCAL_FORMAT).to_string()),
                );
                attributes.insert(
                    "end_time".into(),
                    AttributeValue::String(occ.end.format(LOCAL_FORMAT).to_string()),
                );
                attributes.insert("description".into(), AttributeValue::String(event.description));
                if active {
                    (EntityState::On, occ.end_utc())
                } else {
                    (EntityState::Off, occ.start_utc())
                }
            }
            None => {
                for key in ["message", "start_time", "end_time", "description"] {
                    attributes.insert(key.into(), AttributeValue::Null);
                }
                (EntityState::Off, midnight)
            }
        };

        Evaluation {
            update: self.naming.update(state, attributes, now),
            next_wake: boundary.min(midnight),
        }
    }
}
