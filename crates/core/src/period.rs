//! Time periods selectable in the filter.
//!
//! A non-empty ordered sequence of periods forms the active time window;
//! position 0 is the main period and drives the data-fetch cycle.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Date format used at every service boundary.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One selectable time period.
///
/// Equality is by value (`PartialEq`), which is the `is_equal_periods`
/// contract: two periods with identical fields are the same period no
/// matter where they came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub from: NaiveDate,
    pub to: NaiveDate,
    #[serde(default)]
    pub average: bool,
    #[serde(default)]
    pub weekdays: Vec<Weekday>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Period {
    /// The default window: start of the current ISO week through `today`,
    /// no averaging, no weekday restriction.
    pub fn default_window(today: NaiveDate) -> Self {
        let offset = today.weekday().num_days_from_monday() as i64;
        Self {
            from: today - Duration::days(offset),
            to: today,
            average: false,
            weekdays: Vec::new(),
            kind: None,
        }
    }

    /// Bounds formatted as the service boundary expects them.
    pub fn format_bounds(&self) -> (String, String) {
        (
            self.from.format(DATE_FORMAT).to_string(),
            self.to.format(DATE_FORMAT).to_string(),
        )
    }
}

/// Value equality between two periods.
pub fn is_equal_periods(a: &Period, b: &Period) -> bool {
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn default_window_starts_on_monday() {
        // 2024-01-10 is a Wednesday; its week starts 2024-01-08.
        let period = Period::default_window(date(2024, 1, 10));
        assert_eq!(period.from, date(2024, 1, 8));
        assert_eq!(period.to, date(2024, 1, 10));
        assert!(!period.average);
        assert!(period.weekdays.is_empty());
    }

    #[test]
    fn default_window_on_monday_is_single_day() {
        let period = Period::default_window(date(2024, 1, 8));
        assert_eq!(period.from, date(2024, 1, 8));
        assert_eq!(period.to, date(2024, 1, 8));
    }

    #[test]
    fn bounds_use_iso_dates() {
        let period = Period::default_window(date(2024, 1, 10));
        let (from, to) = period.format_bounds();
        assert_eq!(from, "2024-01-08");
        assert_eq!(to, "2024-01-10");
    }

    #[test]
    fn equality_is_by_value_not_identity() {
        let a = Period::default_window(date(2024, 1, 10));
        let b = a.clone();
        assert!(is_equal_periods(&a, &b));

        let mut c = a.clone();
        c.average = true;
        assert!(!is_equal_periods(&a, &c));
    }
}
