//! Raw, user-supplied schedule settings and their strict validation.

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::days_off::DayOffRange;
use super::pattern::{Pattern, PatternSlot};
use crate::error::ValidationError;

pub const DEFAULT_NAME: &str = "Workshift";
pub const DEFAULT_SHIFT_HOURS: u32 = 8;
pub const DEFAULT_SHIFTS_PER_DAY: u32 = 3;
pub const DEFAULT_PATTERN: &str = "333330022222001111100";
pub const MAX_SHIFT_HOURS: u32 = 24;
pub const MAX_SHIFTS_PER_DAY: u32 = 9;

const TIME_FORMAT: &str = "%H:%M";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// One schedule entry as written in a configuration file.
///
/// Everything is kept as plain strings so that a half-broken entry can still
/// be loaded leniently by [`ScheduleConfig::from_settings`](super::ScheduleConfig::from_settings);
/// [`validate`](Self::validate) applies the strict rules a front-end enforces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSettings {
    pub name: String,
    pub use_workday_sensor: bool,
    pub workday_entity_today: Option<String>,
    pub workday_entity_tomorrow: Option<String>,
    pub shift_hours: u32,
    pub shifts_per_day: u32,
    pub shift_starts: Vec<String>,
    pub schedule_start_date: Option<String>,
    pub schedule: String,
    pub manual_days_off: Vec<String>,
    pub shift_names: Vec<String>,
    /// IANA zone name. Falls back to the host zone when absent.
    pub time_zone: Option<String>,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            use_workday_sensor: false,
            workday_entity_today: None,
            workday_entity_tomorrow: None,
            shift_hours: DEFAULT_SHIFT_HOURS,
            shifts_per_day: DEFAULT_SHIFTS_PER_DAY,
            shift_starts: vec!["06:00".into(), "14:00".into(), "22:00".into()],
            schedule_start_date: None,
            schedule: DEFAULT_PATTERN.to_string(),
            manual_days_off: Vec::new(),
            shift_names: Vec::new(),
            time_zone: None,
        }
    }
}

impl ScheduleSettings {
    /// Apply every rule a configuration front-end enforces.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found, in field order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.use_workday_sensor && non_blank(self.workday_entity_today.as_deref()).is_none() {
            return Err(ValidationError::WorkdayEntityRequired);
        }
        if !(1..=MAX_SHIFT_HOURS).contains(&self.shift_hours) {
            return Err(ValidationError::InvalidShiftHours(self.shift_hours));
        }
        if !(1..=MAX_SHIFTS_PER_DAY).contains(&self.shifts_per_day) {
            return Err(ValidationError::InvalidShiftsPerDay(self.shifts_per_day));
        }
        self.validate_shift_starts()?;
        self.validate_schedule_date()?;
        self.validate_pattern()?;
        for entry in &self.manual_days_off {
            DayOffRange::parse_list(entry)?;
        }
        if self.shift_names.len() > self.shifts_per_day as usize {
            return Err(ValidationError::TooManyShiftNames {
                names: self.shift_names.len(),
                shifts_per_day: self.shifts_per_day,
            });
        }
        if let Some(raw) = non_blank(self.time_zone.as_deref()) {
            raw.parse::<Tz>()
                .map_err(|_| ValidationError::InvalidTimeZone(raw.to_string()))?;
        }
        Ok(())
    }

    fn validate_shift_starts(&self) -> Result<(), ValidationError> {
        let mut previous: Option<NaiveTime> = None;
        for raw in &self.shift_starts {
            let time = parse_time(raw)
                .ok_or_else(|| ValidationError::InvalidShiftStartFormat(raw.clone()))?;
            if previous.is_some_and(|prev| time <= prev) {
                return Err(ValidationError::InvalidShiftStartOrder(raw.clone()));
            }
            previous = Some(time);
        }
        if self.shift_starts.len() != self.shifts_per_day as usize {
            return Err(ValidationError::ShiftStartCountMismatch {
                expected: self.shifts_per_day as usize,
                actual: self.shift_starts.len(),
            });
        }
        Ok(())
    }

    fn validate_schedule_date(&self) -> Result<(), ValidationError> {
        let raw = self.schedule_start_date.as_deref().unwrap_or_default();
        parse_date(raw)
            .map(|_| ())
            .ok_or_else(|| ValidationError::InvalidScheduleDate(raw.to_string()))
    }

    fn validate_pattern(&self) -> Result<(), ValidationError> {
        let pattern = Pattern::new(&self.schedule);
        if pattern.is_empty() {
            return Err(ValidationError::InvalidSchedulePattern);
        }
        for idx in 0..pattern.len() {
            match pattern.slot(idx) {
                PatternSlot::Invalid(_) => return Err(ValidationError::InvalidSchedulePattern),
                PatternSlot::Shift(code) if u32::from(code) > self.shifts_per_day => {
                    return Err(ValidationError::InvalidScheduleDigit {
                        digit: u32::from(code),
                        shifts_per_day: self.shifts_per_day,
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }
}

pub(crate) fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT).ok()
}

pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

pub(crate) fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ScheduleSettings {
        ScheduleSettings {
            name: "Night Crew".into(),
            schedule_start_date: Some("2025-01-06".into()),
            schedule: "123012301230".into(),
            ..ScheduleSettings::default()
        }
    }

    #[test]
    fn should_accept_valid_settings() {
        assert_eq!(valid().validate(), Ok(()));
    }

    #[test]
    fn should_reject_empty_name() {
        let settings = ScheduleSettings {
            name: " ".into(),
            ..valid()
        };
        assert_eq!(settings.validate(), Err(ValidationError::EmptyName));
    }

    #[test]
    fn should_require_workday_entity_when_enabled() {
        let settings = ScheduleSettings {
            use_workday_sensor: true,
            ..valid()
        };
        assert_eq!(settings.validate(), Err(ValidationError::WorkdayEntityRequired));

        let settings = ScheduleSettings {
            use_workday_sensor: true,
            workday_entity_today: Some("binary_sensor.workday".into()),
            ..valid()
        };
        assert_eq!(settings.validate(), Ok(()));
    }

    #[test]
    fn should_reject_shift_hours_out_of_range() {
        for hours in [0, 25] {
            let settings = ScheduleSettings {
                shift_hours: hours,
                ..valid()
            };
            assert_eq!(settings.validate(), Err(ValidationError::InvalidShiftHours(hours)));
        }
    }

    #[test]
    fn should_reject_shifts_per_day_out_of_range() {
        let settings = ScheduleSettings {
            shifts_per_day: 10,
            ..valid()
        };
        assert_eq!(settings.validate(), Err(ValidationError::InvalidShiftsPerDay(10)));
    }

    #[test]
    fn should_reject_badly_formatted_start() {
        let settings = ScheduleSettings {
            shift_starts: vec!["06:00".into(), "2pm".into(), "22:00".into()],
            ..valid()
        };
        assert_eq!(
            settings.validate(),
            Err(ValidationError::InvalidShiftStartFormat("2pm".into()))
        );
    }

    #[test]
    fn should_reject_non_ascending_starts() {
        let settings = ScheduleSettings {
            shift_starts: vec!["06:00".into(), "06:00".into(), "22:00".into()],
            ..valid()
        };
        assert_eq!(
            settings.validate(),
            Err(ValidationError::InvalidShiftStartOrder("06:00".into()))
        );
    }

    #[test]
    fn should_reject_start_count_mismatch() {
        let settings = ScheduleSettings {
            shift_starts: vec!["06:00".into(), "14:00".into()],
            ..valid()
        };
        assert_eq!(
            settings.validate(),
            Err(ValidationError::ShiftStartCountMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn should_reject_missing_or_bad_schedule_date() {
        let settings = ScheduleSettings {
            schedule_start_date: None,
            ..valid()
        };
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::InvalidScheduleDate(_))
        ));

        let settings = ScheduleSettings {
            schedule_start_date: Some("06.01.2025".into()),
            ..valid()
        };
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::InvalidScheduleDate(_))
        ));
    }

    #[test]
    fn should_reject_empty_or_non_digit_pattern() {
        for schedule in ["", "  ", "12a0"] {
            let settings = ScheduleSettings {
                schedule: schedule.into(),
                ..valid()
            };
            assert_eq!(settings.validate(), Err(ValidationError::InvalidSchedulePattern));
        }
    }

    #[test]
    fn should_reject_digit_above_shift_count() {
        let settings = ScheduleSettings {
            schedule: "12340".into(),
            ..valid()
        };
        assert_eq!(
            settings.validate(),
            Err(ValidationError::InvalidScheduleDigit {
                digit: 4,
                shifts_per_day: 3
            })
        );
    }

    #[test]
    fn should_reject_bad_day_off() {
        let settings = ScheduleSettings {
            manual_days_off: vec!["2025-01-06, soon".into()],
            ..valid()
        };
        assert_eq!(
            settings.validate(),
            Err(ValidationError::InvalidDayOff("soon".into()))
        );
    }

    #[test]
    fn should_reject_too_many_shift_names() {
        let settings = ScheduleSettings {
            shift_names: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            ..valid()
        };
        assert_eq!(
            settings.validate(),
            Err(ValidationError::TooManyShiftNames {
                names: 4,
                shifts_per_day: 3
            })
        );
    }

    #[test]
    fn should_reject_unknown_time_zone() {
        let settings = ScheduleSettings {
            time_zone: Some("Mars/Olympus".into()),
            ..valid()
        };
        assert_eq!(
            settings.validate(),
            Err(ValidationError::InvalidTimeZone("Mars/Olympus".into()))
        );
    }

    #[test]
    fn should_deserialize_with_defaults() {
        let settings: ScheduleSettings =
            serde_json::from_str(r#"{"name": "Crew", "schedule_start_date": "2025-01-06"}"#).unwrap();
        assert_eq!(settings.shift_hours, DEFAULT_SHIFT_HOURS);
        assert_eq!(settings.shift_starts.len(), 3);
        assert_eq!(settings.schedule, DEFAULT_PATTERN);
        assert_eq!(settings.validate(), Ok(()));
    }
}
