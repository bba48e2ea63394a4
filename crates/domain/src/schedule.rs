//! Schedule — the rotation configuration and the resolver built on it.
//!
//! A schedule anchors a cyclic pattern of shift codes on a calendar date.
//! Each code maps to a start time; every shift lasts the same number of
//! hours. Manual days off and an optional workday signal can suppress a day.

mod config;
mod days_off;
mod occurrence;
mod pattern;
mod resolver;
mod settings;
mod workday;

pub use config::{DEFAULT_SHIFT_LABEL, ScheduleConfig, ScheduleConfigBuilder};
pub use days_off::{DayOffRange, DaysOff};
pub use occurrence::ShiftOccurrence;
pub use pattern::{Pattern, PatternSlot};
pub use resolver::{DEFAULT_SEARCH_HORIZON_DAYS, ShiftResolver};
pub use settings::{
    DEFAULT_NAME, DEFAULT_PATTERN, DEFAULT_SHIFT_HOURS, DEFAULT_SHIFTS_PER_DAY, MAX_SHIFT_HOURS,
    MAX_SHIFTS_PER_DAY, ScheduleSettings,
};
pub use workday::{NoSignals, SignalSnapshot, WorkdayOverride, WorkdaySource, WorkdayState};
