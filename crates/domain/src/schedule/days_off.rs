//! Manual days off — inclusive date ranges that force "no shift".

use chrono::NaiveDate;

use super::settings::parse_date;
use crate::error::ValidationError;

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DayOffRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DayOffRange {
    /// A range covering a single date.
    #[must_use]
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Build a range, rejecting `end < start`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDayOff`] when the range is reversed.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::InvalidDayOff(format!("{start}..{end}")));
        }
        Ok(Self { start, end })
    }

    /// Parse `YYYY-MM-DD` or `YYYY-MM-DD..YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDayOff`] for unparseable dates or a
    /// reversed range.
    pub fn parse(entry: &str) -> Result<Self, ValidationError> {
        let entry = entry.trim();
        let invalid = || ValidationError::InvalidDayOff(entry.to_string());
        let date = |raw: &str| parse_date(raw).ok_or_else(invalid);

        match entry.split_once("..") {
            Some((start, end)) => Self::new(date(start)?, date(end)?),
            None => date(entry).map(Self::single),
        }
    }

    /// Parse a comma- or newline-separated list, skipping blank entries.
    ///
    /// # Errors
    ///
    /// Returns the first entry that fails [`parse`](Self::parse).
    pub fn parse_list(input: &str) -> Result<Vec<Self>, ValidationError> {
        split_entries(input).map(Self::parse).collect()
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Split raw input on commas and newlines, dropping blanks.
pub(crate) fn split_entries(input: &str) -> impl Iterator<Item = &str> {
    input
        .split([',', '\n'])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
}

/// A normalised set of disjoint day-off ranges.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DaysOff(Vec<DayOffRange>);

impl DaysOff {
    /// Sort the ranges and merge overlapping or adjacent ones.
    #[must_use]
    pub fn new(ranges: impl IntoIterator<Item = DayOffRange>) -> Self {
        let mut sorted: Vec<DayOffRange> = ranges.into_iter().collect();
        sorted.sort();

        let mut merged: Vec<DayOffRange> = Vec::with_capacity(sorted.len());
        for range in sorted {
            match merged.last_mut() {
                Some(last) if range.start <= last.end.succ_opt().unwrap_or(NaiveDate::MAX) => {
                    last.end = last.end.max(range.end);
                }
                _ => merged.push(range),
            }
        }
        Self(merged)
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.0.iter().any(|range| range.contains(date))
    }

    #[must_use]
    pub fn ranges(&self) -> &[DayOffRange] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    #[test]
    fn should_parse_single_date() {
        let range = DayOffRange::parse("2025-01-06").unwrap();
        assert_eq!(range, DayOffRange::single(d(6)));
    }

    #[test]
    fn should_parse_date_range() {
        let range = DayOffRange::parse(" 2025-01-06..2025-01-10 ").unwrap();
        assert_eq!(range.start, d(6));
        assert_eq!(range.end, d(10));
    }

    #[test]
    fn should_reject_reversed_range() {
        let result = DayOffRange::parse("2025-01-10..2025-01-06");
        assert!(matches!(result, Err(ValidationError::InvalidDayOff(_))));
    }

    #[test]
    fn should_reject_garbage() {
        assert!(DayOffRange::parse("next tuesday").is_err());
        assert!(DayOffRange::parse("2025-01-06..").is_err());
    }

    #[test]
    fn should_parse_comma_and_newline_separated_list() {
        let ranges = DayOffRange::parse_list("2025-01-06, 2025-01-08..2025-01-09\n\n2025-01-20").unwrap();
        assert_eq!(ranges.len(), 3);
        assert_eq!(ranges[2], DayOffRange::single(d(20)));
    }

    #[test]
    fn should_merge_overlapping_and_adjacent_ranges() {
        let days_off = DaysOff::new([
            DayOffRange::new(d(10), d(12)).unwrap(),
            DayOffRange::single(d(6)),
            DayOffRange::new(d(7), d(8)).unwrap(),
            DayOffRange::new(d(11), d(15)).unwrap(),
        ]);
        assert_eq!(
            days_off.ranges(),
            &[
                DayOffRange::new(d(6), d(8)).unwrap(),
                DayOffRange::new(d(10), d(15)).unwrap(),
            ]
        );
    }

    #[test]
    fn should_check_membership_inclusively() {
        let days_off = DaysOff::new([DayOffRange::new(d(6), d(10)).unwrap()]);
        assert!(days_off.contains(d(6)));
        assert!(days_off.contains(d(10)));
        assert!(!days_off.contains(d(5)));
        assert!(!days_off.contains(d(11)));
    }
}
