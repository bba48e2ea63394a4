//! Concrete shift instances produced by the resolver.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::time::Timestamp;

/// A concrete shift: a code plus the instants it starts and ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftOccurrence {
    /// Shift code, `1..=9`.
    pub code: u8,
    pub start: DateTime<Tz>,
    /// Always `start + shift duration`.
    pub end: DateTime<Tz>,
    /// Calendar date whose pattern entry produced this shift.
    pub source_date: NaiveDate,
    /// Position in the rotation pattern for `source_date`.
    pub rotation_index: usize,
}

impl ShiftOccurrence {
    /// Whether `instant` falls in `[start, end)`.
    #[must_use]
    pub fn covers(&self, instant: Timestamp) -> bool {
        self.start_utc() <= instant && instant < self.end_utc()
    }

    /// Whether the shift overlaps the half-open window `[from, to)`.
    #[must_use]
    pub fn overlaps(&self, from: Timestamp, to: Timestamp) -> bool {
        self.end_utc() > from && self.start_utc() < to
    }

    #[must_use]
    pub fn start_utc(&self) -> Timestamp {
        self.start.with_timezone(&Utc)
    }

    #[must_use]
    pub fn end_utc(&self) -> Timestamp {
        self.end.with_timezone(&Utc)
    }
}
