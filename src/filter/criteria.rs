// Filter criteria: the user-controlled half of the dashboard state.
//
// The date range invariant (start <= end) is kept here, at the input
// boundary, by clamping. The filtering engine never sees an inverted range.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::posts::Severity;

/// First day of the initial dashboard window.
pub const DEFAULT_FIRST_DAY: (i32, u32, u32) = (2025, 4, 14);
/// Last day of the initial dashboard window.
pub const DEFAULT_LAST_DAY: (i32, u32, u32) = (2025, 4, 16);

/// Midnight at the start of `day`.
pub fn start_of_day(day: NaiveDate) -> NaiveDateTime {
    day.and_hms_opt(0, 0, 0).expect("midnight is a valid time")
}

/// The last representable instant of `day`.
pub fn end_of_day(day: NaiveDate) -> NaiveDateTime {
    day.and_hms_nano_opt(23, 59, 59, 999_999_999)
        .expect("23:59:59.999999999 is a valid time")
}

/// Parse a `YYYY-MM-DD` calendar day.
pub fn parse_day(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::BadDay(s.to_string()))
}

/// An inclusive timestamp range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvertedDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Whole calendar days, as a date picker selects them: from midnight of
    /// `first` through the last instant of `last`.
    pub fn days(first: NaiveDate, last: NaiveDate) -> Result<Self, ValidationError> {
        Self::new(start_of_day(first), end_of_day(last))
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Inclusive at both ends.
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at <= self.end
    }
}

impl Default for DateRange {
    fn default() -> Self {
        let (y, m, d) = DEFAULT_FIRST_DAY;
        let first = NaiveDate::from_ymd_opt(y, m, d).expect("valid default day");
        let (y, m, d) = DEFAULT_LAST_DAY;
        let last = NaiveDate::from_ymd_opt(y, m, d).expect("valid default day");
        Self {
            start: start_of_day(first),
            end: end_of_day(last),
        }
    }
}

/// The set of selected severity levels. Empty is legal and matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeveritySet(BTreeSet<Severity>);

impl SeveritySet {
    pub fn all() -> Self {
        Severity::ALL.into_iter().collect()
    }

    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    pub fn contains(&self, severity: Severity) -> bool {
        self.0.contains(&severity)
    }

    pub fn insert(&mut self, severity: Severity) {
        self.0.insert(severity);
    }

    pub fn remove(&mut self, severity: Severity) {
        self.0.remove(&severity);
    }

    /// Checkbox behavior: remove if selected, add otherwise.
    /// Returns whether the level is selected afterwards.
    pub fn toggle(&mut self, severity: Severity) -> bool {
        if self.0.remove(&severity) {
            false
        } else {
            self.0.insert(severity);
            true
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Levels in display order (high, medium, low).
    pub fn iter(&self) -> impl Iterator<Item = Severity> + '_ {
        self.0.iter().copied()
    }
}

impl Default for SeveritySet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<Severity> for SeveritySet {
    fn from_iter<I: IntoIterator<Item = Severity>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Everything the filtering engine needs to decide which posts to show.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    range: DateRange,
    severities: SeveritySet,
    location_query: String,
}

impl FilterCriteria {
    pub fn new(range: DateRange, severities: SeveritySet, location_query: impl Into<String>) -> Self {
        Self {
            range,
            severities,
            location_query: location_query.into(),
        }
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn start(&self) -> NaiveDateTime {
        self.range.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.range.end
    }

    pub fn severities(&self) -> &SeveritySet {
        &self.severities
    }

    pub fn location_query(&self) -> &str {
        &self.location_query
    }

    pub fn set_range(&mut self, range: DateRange) {
        self.range = range;
    }

    /// Move the start of the range. If it passes the end, the end follows it.
    pub fn set_start(&mut self, start: NaiveDateTime) {
        self.range.start = start;
        if self.range.end < start {
            self.range.end = start;
        }
    }

    /// Move the end of the range, clamped so it never precedes the start.
    pub fn set_end(&mut self, end: NaiveDateTime) {
        self.range.end = end.max(self.range.start);
    }

    /// Day-picker form of `set_start`.
    pub fn set_first_day(&mut self, day: NaiveDate) {
        self.range.start = start_of_day(day);
        if self.range.end < self.range.start {
            self.range.end = end_of_day(day);
        }
    }

    /// Day-picker form of `set_end`; a day before the start day clamps to it.
    pub fn set_last_day(&mut self, day: NaiveDate) {
        let day = day.max(self.range.start.date());
        self.range.end = end_of_day(day);
    }

    pub fn set_severities(&mut self, severities: SeveritySet) {
        self.severities = severities;
    }

    pub fn toggle_severity(&mut self, severity: Severity) -> bool {
        self.severities.toggle(severity)
    }

    pub fn set_location_query(&mut self, query: impl Into<String>) {
        self.location_query = query.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_window_covers_three_whole_days() {
        let c = FilterCriteria::default();
        assert_eq!(c.start(), start_of_day(day(2025, 4, 14)));
        assert_eq!(c.end(), end_of_day(day(2025, 4, 16)));
        assert_eq!(c.severities(), &SeveritySet::all());
        assert!(c.location_query().is_empty());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = DateRange::days(day(2025, 4, 16), day(2025, 4, 14)).unwrap_err();
        assert!(matches!(err, ValidationError::InvertedDateRange { .. }));
    }

    #[test]
    fn test_single_instant_range_is_valid() {
        let t = start_of_day(day(2025, 4, 15));
        let range = DateRange::new(t, t).unwrap();
        assert!(range.contains(t));
    }

    #[test]
    fn test_set_end_before_start_clamps_to_start() {
        let mut c = FilterCriteria::default();
        c.set_end(start_of_day(day(2025, 1, 1)));
        assert_eq!(c.end(), c.start());
    }

    #[test]
    fn test_set_start_past_end_drags_end_along() {
        let mut c = FilterCriteria::default();
        let later = start_of_day(day(2025, 5, 1));
        c.set_start(later);
        assert_eq!(c.start(), later);
        assert_eq!(c.end(), later);
    }

    #[test]
    fn test_day_setters_keep_invariant() {
        let mut c = FilterCriteria::default();
        c.set_first_day(day(2025, 4, 20));
        assert!(c.start() <= c.end());
        assert_eq!(c.end(), end_of_day(day(2025, 4, 20)));

        c.set_last_day(day(2025, 4, 1));
        assert_eq!(c.end(), end_of_day(day(2025, 4, 20)));
    }

    #[test]
    fn test_toggle_severity() {
        let mut set = SeveritySet::all();
        assert!(!set.toggle(Severity::Medium));
        assert!(!set.contains(Severity::Medium));
        assert!(set.toggle(Severity::Medium));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_parse_day() {
        assert_eq!(parse_day("2025-04-14").unwrap(), day(2025, 4, 14));
        assert!(matches!(parse_day("14/04/2025"), Err(ValidationError::BadDay(_))));
    }
}
