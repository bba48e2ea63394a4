//! Rotation pattern — one character per day, repeated cyclically.

use std::fmt;

/// What the pattern says about a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternSlot {
    /// Digit `0`: no shift.
    Off,
    /// Digit `1`–`9`: shift with this code.
    Shift(u8),
    /// Anything that is not a decimal digit.
    Invalid(char),
}

/// A cyclic rotation such as `"123012301230"`.
///
/// Whitespace is stripped on construction; every other character is kept so
/// that corrupt entries can be reported when they are reached.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pattern(Vec<char>);

impl Pattern {
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.chars().filter(|ch| !ch.is_whitespace()).collect())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Position in the cycle for a day `offset` days after the anchor.
    ///
    /// Negative offsets are *not* wrapped: days before the anchor have no
    /// position. An empty pattern has no positions at all.
    #[must_use]
    pub fn index_for(&self, offset: i64) -> Option<usize> {
        if offset < 0 || self.0.is_empty() {
            return None;
        }
        let offset = usize::try_from(offset).ok()?;
        Some(offset % self.0.len())
    }

    /// Decode the character at `index` (must come from [`index_for`](Self::index_for)).
    #[must_use]
    pub fn slot(&self, index: usize) -> PatternSlot {
        match self.0.get(index) {
            Some('0') => PatternSlot::Off,
            Some(ch) => match ch.to_digit(10) {
                Some(digit) => PatternSlot::Shift(u8::try_from(digit).unwrap_or(u8::MAX)),
                None => PatternSlot::Invalid(*ch),
            },
            None => PatternSlot::Off,
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|ch| write!(f, "{ch}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_strip_whitespace_on_construction() {
        let pattern = Pattern::new(" 1230 1230\n");
        assert_eq!(pattern.to_string(), "12301230");
        assert_eq!(pattern.len(), 8);
    }

    #[test]
    fn should_wrap_non_negative_offsets() {
        let pattern = Pattern::new("123012301230");
        assert_eq!(pattern.index_for(0), Some(0));
        assert_eq!(pattern.index_for(12), Some(0));
        assert_eq!(pattern.index_for(15), Some(3));
    }

    #[test]
    fn should_not_wrap_negative_offsets() {
        let pattern = Pattern::new("1230");
        assert_eq!(pattern.index_for(-1), None);
    }

    #[test]
    fn should_have_no_index_when_empty() {
        assert_eq!(Pattern::new("").index_for(3), None);
    }

    #[test]
    fn should_decode_slots() {
        let pattern = Pattern::new("10x3");
        assert_eq!(pattern.slot(0), PatternSlot::Shift(1));
        assert_eq!(pattern.slot(1), PatternSlot::Off);
        assert_eq!(pattern.slot(2), PatternSlot::Invalid('x'));
        assert_eq!(pattern.slot(3), PatternSlot::Shift(3));
    }
}
