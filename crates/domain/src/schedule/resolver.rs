//! Shift resolution — turning a date or an instant into a [`ShiftOccurrence`].
//!
//! The resolver is a pure function of its inputs: the schedule, the date the
//! caller considers "today", and a snapshot of workday signals. It never
//! reads the clock, so results are reproducible in tests.

use chrono::{Days, NaiveDate};

use super::config::ScheduleConfig;
use super::occurrence::ShiftOccurrence;
use super::pattern::PatternSlot;
use super::workday::{WorkdaySource, WorkdayState};
use crate::time::{Timestamp, combine};

/// How far [`ShiftResolver::next_shift_after`] searches by default.
pub const DEFAULT_SEARCH_HORIZON_DAYS: u32 = 90;

/// Evaluates a [`ScheduleConfig`] for one "today".
#[derive(Clone, Copy)]
pub struct ShiftResolver<'a> {
    config: &'a ScheduleConfig,
    today: NaiveDate,
    signals: &'a dyn WorkdaySource,
}

impl std::fmt::Debug for ShiftResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShiftResolver")
            .field("schedule", &self.config.name())
            .field("today", &self.today)
            .finish_non_exhaustive()
    }
}

impl<'a> ShiftResolver<'a> {
    #[must_use]
    pub fn new(config: &'a ScheduleConfig, today: NaiveDate, signals: &'a dyn WorkdaySource) -> Self {
        Self {
            config,
            today,
            signals,
        }
    }

    #[must_use]
    pub fn config(&self) -> &'a ScheduleConfig {
        self.config
    }

    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Shift whose pattern entry belongs to `date`, if any.
    ///
    /// Checked in order: manual days off, dates before the anchor, the
    /// pattern character, the start-time table and finally the workday
    /// signal (only consulted for today and tomorrow).
    #[must_use]
    pub fn resolve(&self, date: NaiveDate) -> Option<ShiftOccurrence> {
        let config = self.config;

        if config.days_off().contains(date) {
            return None;
        }

        let offset = (date - config.base_date()).num_days();
        let rotation_index = config.pattern().index_for(offset)?;

        let code = match config.pattern().slot(rotation_index) {
            PatternSlot::Off => return None,
            PatternSlot::Shift(code) => code,
            PatternSlot::Invalid(ch) => {
                tracing::warn!(
                    schedule = config.name(),
                    %date,
                    rotation_index,
                    character = %ch,
                    "invalid character in rotation pattern"
                );
                return None;
            }
        };

        let Some(start_time) = config.start_for(code) else {
            tracing::warn!(
                schedule = config.name(),
                %date,
                code,
                configured = config.shift_starts().len(),
                "no start time for shift code"
            );
            return None;
        };

        if let Some(signal_id) = config.workday().signal_for(date, self.today) {
            match self.signals.workday_state(signal_id) {
                Some(WorkdayState::NonWorkday) => {
                    tracing::debug!(schedule = config.name(), %date, signal_id, "shift suppressed by workday signal");
                    return None;
                }
                Some(WorkdayState::Workday) => {}
                None => {
                    tracing::debug!(schedule = config.name(), signal_id, "workday signal unavailable, assuming workday");
                }
            }
        }

        let start = combine(date, start_time, config.time_zone());
        Some(ShiftOccurrence {
            code,
            start,
            end: start + config.shift_duration(),
            source_date: date,
            rotation_index,
        })
    }

    /// The shift in progress at `instant`, if any.
    ///
    /// Today's shift wins over a shift that started on an earlier day and is
    /// still running.
    #[must_use]
    pub fn shift_covering(&self, instant: Timestamp) -> Option<ShiftOccurrence> {
        let local_day = self.config.local_date(instant);
        (0..=self.config.lookback_days())
            .filter_map(|back| local_day.checked_sub_days(Days::new(back)))
            .filter_map(|date| self.resolve(date))
            .find(|occ| occ.covers(instant))
    }

    /// First shift that has not ended by `instant`.
    ///
    /// Searches `horizon_days` local days starting with the day of `instant`.
    /// A shift that is already running counts, so callers wanting a shift that
    /// *starts* later should check [`shift_covering`](Self::shift_covering) first.
    #[must_use]
    pub fn next_shift_after(&self, instant: Timestamp, horizon_days: u32) -> Option<ShiftOccurrence> {
        let local_day = self.config.local_date(instant);
        (0..u64::from(horizon_days))
            .filter_map(|ahead| local_day.checked_add_days(Days::new(ahead)))
            .filter_map(|date| self.resolve(date))
            .find(|occ| occ.end_utc() > instant)
    }

    /// Every shift overlapping `[from, to)`, in start order.
    ///
    /// Empty when `to <= from`.
    #[must_use]
    pub fn occurrences_between(&self, from: Timestamp, to: Timestamp) -> Vec<ShiftOccurrence> {
        if to <= from {
            return Vec::new();
        }
        let first = self
            .config
            .local_date(from)
            .checked_sub_days(Days::new(self.config.lookback_days()))
            .unwrap_or(NaiveDate::MIN);
        let last = self.config.local_date(to);

        first
            .iter_days()
            .take_while(|date| *date <= last)
            .filter_map(|date| self.resolve(date))
            .filter(|occ| occ.overlaps(from, to))
            .collect()
    }
}
