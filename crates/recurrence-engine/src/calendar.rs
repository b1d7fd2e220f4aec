//! Calendar-day arithmetic over the 8-digit `YYYYMMDD` wire format.
//!
//! [`CalendarDate`] wraps `chrono::NaiveDate` and restricts it to years
//! 0000-9999 so every value formats back to exactly eight digits.

use crate::error::{RecurrenceError, Result};
use chrono::{Datelike, Days, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Largest year representable in the `YYYYMMDD` format.
pub const MAX_YEAR: i32 = 9999;

/// A Gregorian calendar day with no time-of-day or zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Parse a fixed-width `YYYYMMDD` string.
    ///
    /// # Errors
    /// Returns `RecurrenceError::InvalidDateFormat` if the input is not eight ASCII
    /// digits or does not name a real calendar day (e.g. `20230229`).
    pub fn parse(s: &str) -> Result<Self> {
        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RecurrenceError::InvalidDateFormat(format!(
                "'{}' is not an 8-digit YYYYMMDD date",
                s
            )));
        }

        // All-digit input of length 8, so the slices are valid numbers.
        let year: i32 = s[0..4].parse().unwrap_or_default();
        let month: u32 = s[4..6].parse().unwrap_or_default();
        let day: u32 = s[6..8].parse().unwrap_or_default();

        Self::from_ymd(year, month, day).ok_or_else(|| {
            RecurrenceError::InvalidDateFormat(format!("'{}' is not a valid calendar date", s))
        })
    }

    /// Parse the `DD.MM.YYYY` form users type into the task search box.
    ///
    /// # Errors
    /// Returns `RecurrenceError::InvalidDateFormat` if the text is not a valid
    /// dotted date.
    pub fn parse_dotted(s: &str) -> Result<Self> {
        NaiveDate::parse_from_str(s, "%d.%m.%Y")
            .ok()
            .filter(|_| s.len() == 10)
            .and_then(Self::from_naive)
            .ok_or_else(|| {
                RecurrenceError::InvalidDateFormat(format!("'{}' is not a DD.MM.YYYY date", s))
            })
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).and_then(Self::from_naive)
    }

    /// Wrap a chrono date, rejecting years outside 0000-9999.
    pub fn from_naive(date: NaiveDate) -> Option<Self> {
        (0..=MAX_YEAR).contains(&date.year()).then_some(Self(date))
    }

    /// The current UTC calendar day.
    pub fn today() -> Self {
        Self(Utc::now().date_naive())
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// ISO weekday number, Monday = 1 through Sunday = 7.
    pub fn weekday(&self) -> u32 {
        self.0.weekday().number_from_monday()
    }

    /// Last day-of-month of this date's month.
    pub fn last_day_of_month(&self) -> u32 {
        days_in_month(self.year(), self.month())
    }

    /// The following calendar day, or `None` past 9999-12-31.
    pub fn succ(&self) -> Option<Self> {
        self.add_days(1)
    }

    pub fn add_days(&self, days: u64) -> Option<Self> {
        self.0.checked_add_days(Days::new(days)).and_then(Self::from_naive)
    }

    /// Same month/day `years` later. A Feb 29 that lands in a non-leap year
    /// becomes Mar 1 of that year.
    pub fn add_years(&self, years: u32) -> Option<Self> {
        let year = self.year().checked_add(i32::try_from(years).ok()?)?;
        if self.month() == 2 && self.day() == 29 && !is_leap_year(year) {
            return Self::from_ymd(year, 3, 1);
        }
        Self::from_ymd(year, self.month(), self.day())
    }

    /// Whole days from `self` to `later` (negative when `later` is earlier).
    pub fn days_until(&self, later: &Self) -> i64 {
        (later.0 - self.0).num_days()
    }
}

/// Gregorian leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in `month` (1-12) of `year`. Returns 0 for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}{:02}", self.year(), self.month(), self.day())
    }
}

impl FromStr for CalendarDate {
    type Err = RecurrenceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn century_years_follow_gregorian_rule() {
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2100));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2025));
    }

    #[test]
    fn february_length_tracks_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 4), 30);
        assert_eq!(days_in_month(2024, 12), 31);
        assert_eq!(days_in_month(2024, 13), 0);
    }

    #[test]
    fn add_years_normalizes_feb_29() {
        let leap = CalendarDate::parse("20240229").unwrap();
        assert_eq!(leap.add_years(1).unwrap().to_string(), "20250301");
        assert_eq!(leap.add_years(4).unwrap().to_string(), "20280229");
    }

    #[test]
    fn arithmetic_stops_at_year_9999() {
        let last = CalendarDate::parse("99991231").unwrap();
        assert!(last.succ().is_none());
        assert!(last.add_years(1).is_none());
    }
}
