//! Calendar-month keys used to group observations.

use chrono::{Datelike, NaiveDateTime};
use serde::{Serialize, Serializer};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// A calendar month, ordered chronologically (year first, then month).
///
/// Formats as `YYYY-MM`.
///
/// # Examples
///
/// ```
/// use smhi_temps::Month;
///
/// let dec: Month = "2023-12".parse().unwrap();
/// let jan = Month::new(1, 2024);
/// assert!(dec < jan);
/// assert_eq!(jan.to_string(), "2024-01");
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Month(pub i32, pub u32);

impl Month {
    pub fn year(self) -> i32 {
        self.0
    }
    pub fn month(self) -> u32 {
        self.1
    }
    pub fn new(month: u32, year: i32) -> Self {
        Self(year, month)
    }

    /// Truncates a timestamp to its year and month.
    pub fn from_datetime(datetime: &NaiveDateTime) -> Self {
        Self(datetime.year(), datetime.month())
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.0, self.1)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid month key '{0}', expected YYYY-MM")]
pub struct MonthParseError(pub String);

impl FromStr for Month {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MonthParseError(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Month(year, month))
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Grouping key for aggregation.
///
/// `Unknown` collects readings that arrived without a timestamp. It sorts after
/// every calendar month.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub enum MonthKey {
    Month(Month),
    Unknown,
}

impl MonthKey {
    pub fn as_month(&self) -> Option<Month> {
        match self {
            MonthKey::Month(month) => Some(*month),
            MonthKey::Unknown => None,
        }
    }
}

impl From<Month> for MonthKey {
    fn from(month: Month) -> Self {
        MonthKey::Month(month)
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MonthKey::Month(month) => month.fmt(f),
            MonthKey::Unknown => write!(f, "unknown"),
        }
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_and_display() {
        let month: Month = "2024-03".parse().unwrap();
        assert_eq!(month, Month(2024, 3));
        assert_eq!(month.to_string(), "2024-03");
        assert_eq!("2024-3".parse::<Month>().unwrap(), Month(2024, 3));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("2024".parse::<Month>().is_err());
        assert!("2024-13".parse::<Month>().is_err());
        assert!("2024-00".parse::<Month>().is_err());
        assert!("march-2024".parse::<Month>().is_err());
    }

    #[test]
    fn test_chronological_order_across_years() {
        let mut months = vec![Month(2024, 1), Month(2023, 12), Month(999, 11), Month(2024, 10)];
        months.sort();
        assert_eq!(
            months,
            vec![Month(999, 11), Month(2023, 12), Month(2024, 1), Month(2024, 10)]
        );
    }

    #[test]
    fn test_unknown_sorts_last() {
        let mut keys = vec![MonthKey::Unknown, Month(2024, 2).into(), Month(2023, 5).into()];
        keys.sort();
        assert_eq!(keys.last(), Some(&MonthKey::Unknown));
        assert_eq!(keys[0], MonthKey::Month(Month(2023, 5)));
        assert_eq!(MonthKey::Unknown.to_string(), "unknown");
    }

    #[test]
    fn test_from_datetime() {
        let dt = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        assert_eq!(Month::from_datetime(&dt), Month(2024, 2));
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&MonthKey::Month(Month(2024, 1))).unwrap();
        assert_eq!(json, "\"2024-01\"");
    }
}
