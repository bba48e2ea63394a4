//! External "is today a workday" signals.

use std::collections::BTreeMap;

use chrono::NaiveDate;

/// Interpreted value of a workday signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkdayState {
    Workday,
    NonWorkday,
}

impl WorkdayState {
    /// Permissive reading of a raw signal value.
    ///
    /// `on`/`true`/`1`/`yes` is a workday, `off`/`false`/`0`/`no` is not
    /// (case-insensitive). Anything else is `None`: callers treat that as a
    /// workday, i.e. no override.
    #[must_use]
    pub fn interpret(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "on" | "true" | "1" | "yes" => Some(Self::Workday),
            "off" | "false" | "0" | "no" => Some(Self::NonWorkday),
            _ => None,
        }
    }
}

/// Read access to the current value of workday signals.
pub trait WorkdaySource {
    /// `None` when the signal is missing or its value is not recognised.
    fn workday_state(&self, signal_id: &str) -> Option<WorkdayState>;
}

/// A source with no signals at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSignals;

impl WorkdaySource for NoSignals {
    fn workday_state(&self, _signal_id: &str) -> Option<WorkdayState> {
        None
    }
}

/// Immutable copy of raw signal values taken for one resolver pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalSnapshot(BTreeMap<String, String>);

impl SignalSnapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy in tests.
    #[must_use]
    pub fn with(mut self, signal_id: impl Into<String>, raw: impl Into<String>) -> Self {
        self.0.insert(signal_id.into(), raw.into());
        self
    }

    #[must_use]
    pub fn raw(&self, signal_id: &str) -> Option<&str> {
        self.0.get(signal_id).map(String::as_str)
    }
}

impl FromIterator<(String, String)> for SignalSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl WorkdaySource for SignalSnapshot {
    fn workday_state(&self, signal_id: &str) -> Option<WorkdayState> {
        self.raw(signal_id).and_then(WorkdayState::interpret)
    }
}

/// Which signals, if any, may suppress today's and tomorrow's shifts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkdayOverride {
    pub enabled: bool,
    pub today: Option<String>,
    pub tomorrow: Option<String>,
}

impl WorkdayOverride {
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn new(today: Option<String>, tomorrow: Option<String>) -> Self {
        Self {
            enabled: true,
            today,
            tomorrow,
        }
    }

    /// Signal consulted for `date` when "today" is `today`.
    ///
    /// Only today and tomorrow are ever overridden. Tomorrow falls back to
    /// the today signal when no dedicated one is configured.
    #[must_use]
    pub fn signal_for(&self, date: NaiveDate, today: NaiveDate) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        if date == today {
            return self.today.as_deref();
        }
        if Some(date) == today.succ_opt() {
            return self.tomorrow.as_deref().or(self.today.as_deref());
        }
        None
    }

    /// Distinct signal ids whose changes should trigger a refresh.
    #[must_use]
    pub fn watched_signals(&self) -> Vec<String> {
        if !self.enabled {
            return Vec::new();
        }
        let mut ids: Vec<String> = self.today.iter().chain(self.tomorrow.iter()).cloned().collect();
        ids.dedup();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    #[test]
    fn should_interpret_signal_values_permissively() {
        assert_eq!(WorkdayState::interpret("on"), Some(WorkdayState::Workday));
        assert_eq!(WorkdayState::interpret(" TRUE "), Some(WorkdayState::Workday));
        assert_eq!(WorkdayState::interpret("1"), Some(WorkdayState::Workday));
        assert_eq!(WorkdayState::interpret("Off"), Some(WorkdayState::NonWorkday));
        assert_eq!(WorkdayState::interpret("false"), Some(WorkdayState::NonWorkday));
        assert_eq!(WorkdayState::interpret("0"), Some(WorkdayState::NonWorkday));
        assert_eq!(WorkdayState::interpret("unavailable"), None);
        assert_eq!(WorkdayState::interpret(""), None);
    }

    #[test]
    fn should_read_snapshot_values() {
        let snapshot = SignalSnapshot::new().with("binary_sensor.workday", "off");
        assert_eq!(
            snapshot.workday_state("binary_sensor.workday"),
            Some(WorkdayState::NonWorkday)
        );
        assert_eq!(snapshot.workday_state("binary_sensor.other"), None);
        assert_eq!(NoSignals.workday_state("binary_sensor.workday"), None);
    }

    #[test]
    fn should_pick_today_signal_for_today() {
        let ov = WorkdayOverride::new(Some("today".into()), Some("tomorrow".into()));
        assert_eq!(ov.signal_for(d(6), d(6)), Some("today"));
        assert_eq!(ov.signal_for(d(7), d(6)), Some("tomorrow"));
        assert_eq!(ov.signal_for(d(8), d(6)), None);
        assert_eq!(ov.signal_for(d(5), d(6)), None);
    }

    #[test]
    fn should_fall_back_to_today_signal_for_tomorrow() {
        let ov = WorkdayOverride::new(Some("today".into()), None);
        assert_eq!(ov.signal_for(d(7), d(6)), Some("today"));
    }

    #[test]
    fn should_ignore_signals_when_disabled() {
        let ov = WorkdayOverride {
            enabled: false,
            today: Some("today".into()),
            tomorrow: None,
        };
        assert_eq!(ov.signal_for(d(6), d(6)), None);
        assert!(ov.watched_signals().is_empty());
    }

    #[test]
    fn should_deduplicate_watched_signals() {
        let ov = WorkdayOverride::new(Some("same".into()), Some("same".into()));
        assert_eq!(ov.watched_signals(), vec!["same".to_string()]);
    }
}
