//! Validated schedule configuration.
//!
//! [`ScheduleConfig`] is what the resolver reads. Malformed raw values are
//! dropped with a warning when building from settings, so a config that
//! exists is always usable.

use chrono::{NaiveDate, NaiveTime, TimeDelta};
use chrono_tz::Tz;

use super::days_off::{DayOffRange, DaysOff, split_entries};
use super::pattern::Pattern;
use super::resolver::ShiftResolver;
use super::settings::{DEFAULT_NAME, ScheduleSettings, non_blank, parse_date, parse_time};
use super::workday::{WorkdayOverride, WorkdaySource};
use crate::time::{Timestamp, local_date, now};

pub const DEFAULT_SHIFT_LABEL: &str = "Shift";

/// An immutable, ready-to-resolve schedule.
///
/// Built either from typed values via [`ScheduleConfig::builder`] or leniently
/// from raw [`ScheduleSettings`] via [`ScheduleConfig::from_settings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleConfig {
    name: String,
    shift_duration_hours: u32,
    pattern: Pattern,
    base_date: NaiveDate,
    shift_starts: Vec<NaiveTime>,
    shift_names: Vec<String>,
    default_label: String,
    days_off: DaysOff,
    workday: WorkdayOverride,
    time_zone: Tz,
}

impl ScheduleConfig {
    #[must_use]
    pub fn builder() -> ScheduleConfigBuilder {
        ScheduleConfigBuilder::default()
    }

    /// Lenient conversion: every broken field falls back instead of failing.
    ///
    /// An unparseable anchor date becomes `today`, an unknown zone becomes
    /// UTC, malformed start times and day-off entries are dropped. Each
    /// fallback is logged as a warning.
    #[must_use]
    pub fn from_settings(settings: &ScheduleSettings, today: NaiveDate, host_zone: Tz) -> Self {
        Self::builder_from_settings(settings, today, host_zone).build()
    }

    /// Same as [`from_settings`](Self::from_settings) but stops before `build`
    /// so the caller can add host-level values such as the shift label.
    #[must_use]
    pub fn builder_from_settings(
        settings: &ScheduleSettings,
        today: NaiveDate,
        host_zone: Tz,
    ) -> ScheduleConfigBuilder {
        let time_zone = match non_blank(settings.time_zone.as_deref()) {
            None => host_zone,
            Some(raw) => raw.parse::<Tz>().unwrap_or_else(|_| {
                tracing::warn!(schedule = %settings.name, time_zone = raw, "unknown time zone, using UTC");
                Tz::UTC
            }),
        };

        let base_date = settings
            .schedule_start_date
            .as_deref()
            .and_then(|raw| {
                let parsed = parse_date(raw);
                if parsed.is_none() {
                    tracing::warn!(schedule = %settings.name, value = raw, "invalid schedule start date");
                }
                parsed
            });

        let shift_starts = settings.shift_starts.iter().filter_map(|raw| {
            let parsed = parse_time(raw);
            if parsed.is_none() {
                tracing::warn!(schedule = %settings.name, value = %raw, "dropping invalid shift start");
            }
            parsed
        });

        let days_off = settings
            .manual_days_off
            .iter()
            .flat_map(|raw| split_entries(raw))
            .filter_map(|entry| match DayOffRange::parse(entry) {
                Ok(range) => Some(range),
                Err(err) => {
                    tracing::warn!(schedule = %settings.name, %err, "skipping manual day off");
                    None
                }
            });

        let workday = if settings.use_workday_sensor {
            WorkdayOverride::new(
                non_blank(settings.workday_entity_today.as_deref()).map(str::to_string),
                non_blank(settings.workday_entity_tomorrow.as_deref()).map(str::to_string),
            )
        } else {
            WorkdayOverride::disabled()
        };

        let mut builder = Self::builder()
            .name(settings.name.clone())
            .shift_duration_hours(settings.shift_hours)
            .pattern(&settings.schedule)
            .fallback_date(today)
            .shift_starts(shift_starts)
            .shift_names(settings.shift_names.iter().cloned())
            .days_off(days_off)
            .workday(workday)
            .time_zone(time_zone);
        if let Some(date) = base_date {
            builder = builder.base_date(date);
        }
        builder
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn shift_duration_hours(&self) -> u32 {
        self.shift_duration_hours
    }

    #[must_use]
    pub fn shift_duration(&self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.shift_duration_hours))
    }

    #[must_use]
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    #[must_use]
    pub fn base_date(&self) -> NaiveDate {
        self.base_date
    }

    #[must_use]
    pub fn shift_starts(&self) -> &[NaiveTime] {
        &self.shift_starts
    }

    /// Start time for `code`, if that many start times are configured.
    #[must_use]
    pub fn start_for(&self, code: u8) -> Option<NaiveTime> {
        let idx = usize::from(code).checked_sub(1)?;
        self.shift_starts.get(idx).copied()
    }

    #[must_use]
    pub fn days_off(&self) -> &DaysOff {
        &self.days_off
    }

    #[must_use]
    pub fn workday(&self) -> &WorkdayOverride {
        &self.workday
    }

    #[must_use]
    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    #[must_use]
    pub fn default_label(&self) -> &str {
        &self.default_label
    }

    /// Display name for a shift code.
    ///
    /// Uses the configured name when present, otherwise `"<label> <code>"`.
    #[must_use]
    pub fn shift_name(&self, code: u8) -> String {
        usize::from(code)
            .checked_sub(1)
            .and_then(|idx| self.shift_names.get(idx))
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map_or_else(|| format!("{} {code}", self.default_label), str::to_string)
    }

    /// Days to look back when searching for a shift covering an instant.
    ///
    /// A shift of `h` hours can reach at most `ceil(h / 24)` days past its
    /// source date.
    #[must_use]
    pub fn lookback_days(&self) -> u64 {
        u64::from(self.shift_duration_hours.div_ceil(24))
    }

    /// Local calendar date of `instant` in this schedule's zone.
    #[must_use]
    pub fn local_date(&self, instant: Timestamp) -> NaiveDate {
        local_date(instant, self.time_zone)
    }

    /// Borrow a resolver evaluated with `today` as the current date.
    #[must_use]
    pub fn resolver<'a>(
        &'a self,
        today: NaiveDate,
        signals: &'a dyn WorkdaySource,
    ) -> ShiftResolver<'a> {
        ShiftResolver::new(self, today, signals)
    }
}

/// Step-by-step builder for [`ScheduleConfig`].
#[derive(Debug, Default)]
pub struct ScheduleConfigBuilder {
    name: Option<String>,
    shift_duration_hours: Option<u32>,
    pattern: Pattern,
    base_date: Option<NaiveDate>,
    fallback_date: Option<NaiveDate>,
    shift_starts: Vec<NaiveTime>,
    shift_names: Vec<String>,
    default_label: Option<String>,
    days_off: Vec<DayOffRange>,
    workday: WorkdayOverride,
    time_zone: Option<Tz>,
}

impl ScheduleConfigBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn shift_duration_hours(mut self, hours: u32) -> Self {
        self.shift_duration_hours = Some(hours);
        self
    }

    #[must_use]
    pub fn pattern(mut self, raw: &str) -> Self {
        self.pattern = Pattern::new(raw);
        self
    }

    #[must_use]
    pub fn base_date(mut self, date: NaiveDate) -> Self {
        self.base_date = Some(date);
        self
    }

    /// Anchor used when no base date was given.
    #[must_use]
    pub fn fallback_date(mut self, date: NaiveDate) -> Self {
        self.fallback_date = Some(date);
        self
    }

    #[must_use]
    pub fn shift_starts(mut self, starts: impl IntoIterator<Item = NaiveTime>) -> Self {
        self.shift_starts = starts.into_iter().collect();
        self
    }

    #[must_use]
    pub fn shift_names(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.shift_names = names.into_iter().collect();
        self
    }

    #[must_use]
    pub fn default_label(mut self, label: impl Into<String>) -> Self {
        self.default_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn days_off(mut self, ranges: impl IntoIterator<Item = DayOffRange>) -> Self {
        self.days_off = ranges.into_iter().collect();
        self
    }

    #[must_use]
    pub fn workday(mut self, workday: WorkdayOverride) -> Self {
        self.workday = workday;
        self
    }

    #[must_use]
    pub fn time_zone(mut self, tz: Tz) -> Self {
        self.time_zone = Some(tz);
        self
    }

    /// Consume the builder.
    ///
    /// Never fails: a zero duration is raised to one hour, a missing anchor
    /// falls back to the fallback date or else to today in the schedule zone.
    #[must_use]
    pub fn build(self) -> ScheduleConfig {
        let time_zone = self.time_zone.unwrap_or(Tz::UTC);
        let name = self
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_NAME.to_string());

        let shift_duration_hours = match self.shift_duration_hours {
            Some(0) => {
                tracing::warn!(schedule = %name, "shift duration of 0 hours raised to 1");
                1
            }
            Some(hours) => hours,
            None => super::settings::DEFAULT_SHIFT_HOURS,
        };

        let base_date = self.base_date.unwrap_or_else(|| {
            let today = self
                .fallback_date
                .unwrap_or_else(|| local_date(now(), time_zone));
            tracing::warn!(schedule = %name, %today, "no schedule start date, anchoring on today");
            today
        });

        let default_label = self
            .default_label
            .filter(|label| !label.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SHIFT_LABEL.to_string());

        ScheduleConfig {
            name,
            shift_duration_hours,
            pattern: self.pattern,
            base_date,
            shift_starts: self.shift_starts,
            shift_names: self.shift_names,
            default_label,
            days_off: DaysOff::new(self.days_off),
            workday: self.workday,
            time_zone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    fn settings() -> ScheduleSettings {
        ScheduleSettings {
            name: "Crew".into(),
            schedule_start_date: Some("2025-01-06".into()),
            schedule: "123012301230".into(),
            ..ScheduleSettings::default()
        }
    }

    #[test]
    fn should_convert_valid_settings() {
        let config = ScheduleConfig::from_settings(&settings(), d(3, 1), chrono_tz::Europe::Warsaw);
        assert_eq!(config.name(), "Crew");
        assert_eq!(config.base_date(), d(1, 6));
        assert_eq!(config.shift_duration_hours(), 8);
        assert_eq!(config.shift_starts().len(), 3);
        assert_eq!(config.time_zone(), chrono_tz::Europe::Warsaw);
        assert_eq!(config.pattern().to_string(), "123012301230");
    }

    #[test]
    fn should_fall_back_to_today_for_invalid_start_date() {
        let raw = ScheduleSettings {
            schedule_start_date: Some("not-a-date".into()),
            ..settings()
        };
        let config = ScheduleConfig::from_settings(&raw, d(3, 1), Tz::UTC);
        assert_eq!(config.base_date(), d(3, 1));
    }

    #[test]
    fn should_fall_back_to_utc_for_unknown_zone() {
        let raw = ScheduleSettings {
            time_zone: Some("Nowhere/Special".into()),
            ..settings()
        };
        let config = ScheduleConfig::from_settings(&raw, d(3, 1), chrono_tz::Europe::Warsaw);
        assert_eq!(config.time_zone(), Tz::UTC);
    }

    #[test]
    fn should_use_explicit_zone_over_host_zone() {
        let raw = ScheduleSettings {
            time_zone: Some("America/New_York".into()),
            ..settings()
        };
        let config = ScheduleConfig::from_settings(&raw, d(3, 1), chrono_tz::Europe::Warsaw);
        assert_eq!(config.time_zone(), chrono_tz::America::New_York);
    }

    #[test]
    fn should_drop_invalid_start_times_and_days_off() {
        let raw = ScheduleSettings {
            shift_starts: vec!["06:00".into(), "later".into(), "22:00".into()],
            manual_days_off: vec!["2025-01-06, garbage\n2025-01-08..2025-01-09".into()],
            ..settings()
        };
        let config = ScheduleConfig::from_settings(&raw, d(3, 1), Tz::UTC);
        assert_eq!(config.shift_starts().len(), 2);
        assert_eq!(config.days_off().ranges().len(), 2);
        assert!(config.days_off().contains(d(1, 9)));
    }

    #[test]
    fn should_clamp_zero_duration_to_one_hour() {
        let config = ScheduleConfig::builder()
            .shift_duration_hours(0)
            .base_date(d(1, 6))
            .build();
        assert_eq!(config.shift_duration_hours(), 1);
    }

    #[test]
    fn should_ignore_workday_ids_when_disabled() {
        let raw = ScheduleSettings {
            use_workday_sensor: false,
            workday_entity_today: Some("binary_sensor.workday".into()),
            ..settings()
        };
        let config = ScheduleConfig::from_settings(&raw, d(3, 1), Tz::UTC);
        assert!(!config.workday().enabled);
    }

    #[test]
    fn should_name_shifts_from_list_or_label() {
        let raw = ScheduleSettings {
            shift_names: vec!["Morning".into(), " ".into()],
            ..settings()
        };
        let config = ScheduleConfig::builder_from_settings(&raw, d(3, 1), Tz::UTC)
            .default_label("Zmiana")
            .build();
        assert_eq!(config.shift_name(1), "Morning");
        assert_eq!(config.shift_name(2), "Zmiana 2");
        assert_eq!(config.shift_name(3), "Zmiana 3");
    }

    #[test]
    fn should_default_label_to_shift() {
        let config = ScheduleConfig::builder().base_date(d(1, 6)).build();
        assert_eq!(config.shift_name(1), "Shift 1");
    }

    #[test]
    fn should_look_back_one_day_for_shifts_up_to_a_day_long() {
        for hours in [1, 8, 24] {
            let config = ScheduleConfig::builder()
                .shift_duration_hours(hours)
                .base_date(d(1, 6))
                .build();
            assert_eq!(config.lookback_days(), 1);
        }
    }

    #[test]
    fn should_map_code_to_start_time() {
        let config = ScheduleConfig::from_settings(&settings(), d(3, 1), Tz::UTC);
        assert_eq!(config.start_for(2), NaiveTime::from_hms_opt(14, 0, 0));
        assert_eq!(config.start_for(0), None);
        assert_eq!(config.start_for(4), None);
    }
}
