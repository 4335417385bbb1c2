//! Calendar month periods.
//!
//! Retainers and fixed costs carry a validity window (`start_date`,
//! optional `end_date`). An entity counts as active in a month when its
//! window overlaps any day of that month.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors constructing a period.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    /// Month outside 1-12.
    #[error("Invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),
}

/// A calendar month within a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    /// Month number (1-12).
    pub month: u32,
    /// Calendar year.
    pub year: i32,
}

impl Period {
    /// Creates a period, validating the month number.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::InvalidMonth` when `month` is outside 1-12.
    pub const fn new(month: u32, year: i32) -> Result<Self, PeriodError> {
        if month < 1 || month > 12 {
            return Err(PeriodError::InvalidMonth(month));
        }
        Ok(Self { month, year })
    }

    /// First day of the month.
    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        // Month is validated at construction.
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(self.year, 1, 1).unwrap_or_default())
    }

    /// Last day of the month (handles leap years and month lengths).
    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        self.first_day() + Months::new(1) - chrono::Duration::days(1)
    }

    /// The following month.
    #[must_use]
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                month: 1,
                year: self.year + 1,
            }
        } else {
            Self {
                month: self.month + 1,
                year: self.year,
            }
        }
    }

    /// The current month according to the system clock.
    #[must_use]
    pub fn current() -> Self {
        let today = chrono::Utc::now().date_naive();
        Self {
            month: today.month(),
            year: today.year(),
        }
    }

    /// Returns true if the given date falls within this month.
    #[must_use]
    pub fn contains_date(self, date: NaiveDate) -> bool {
        date >= self.first_day() && date <= self.last_day()
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Activity-window membership test.
///
/// An entity is active in `period` iff it is flagged active, started on or
/// before the last day of the month, and either has no end date or ends on
/// or after the first day of the month.
#[must_use]
pub fn active_in_period(
    is_active: bool,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    period: Period,
) -> bool {
    if !is_active {
        return false;
    }
    if start_date > period.last_day() {
        return false;
    }
    match end_date {
        Some(end) => end >= period.first_day(),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_period_validation() {
        assert!(Period::new(1, 2026).is_ok());
        assert!(Period::new(12, 2026).is_ok());
        assert_eq!(Period::new(0, 2026), Err(PeriodError::InvalidMonth(0)));
        assert_eq!(Period::new(13, 2026), Err(PeriodError::InvalidMonth(13)));
    }

    #[test]
    fn test_month_bounds() {
        let jan = Period::new(1, 2026).unwrap();
        assert_eq!(jan.first_day(), d(2026, 1, 1));
        assert_eq!(jan.last_day(), d(2026, 1, 31));

        // 2028 is a leap year
        let feb = Period::new(2, 2028).unwrap();
        assert_eq!(feb.last_day(), d(2028, 2, 29));

        let feb = Period::new(2, 2026).unwrap();
        assert_eq!(feb.last_day(), d(2026, 2, 28));
    }

    #[test]
    fn test_next_wraps_year() {
        let dec = Period::new(12, 2026).unwrap();
        assert_eq!(dec.next(), Period::new(1, 2027).unwrap());
        let jun = Period::new(6, 2026).unwrap();
        assert_eq!(jun.next(), Period::new(7, 2026).unwrap());
    }

    #[test]
    fn test_inactive_never_active() {
        let p = Period::new(6, 2026).unwrap();
        assert!(!active_in_period(false, d(2026, 1, 1), None, p));
    }

    #[test]
    fn test_window_boundary_start() {
        let p = Period::new(6, 2026).unwrap();
        // Starting exactly on the last day of the month is in.
        assert!(active_in_period(true, d(2026, 6, 30), None, p));
        // Starting the day after is out.
        assert!(!active_in_period(true, d(2026, 7, 1), None, p));
    }

    #[test]
    fn test_window_boundary_end() {
        let p = Period::new(6, 2026).unwrap();
        // Ending exactly on the first day of the month is in.
        assert!(active_in_period(true, d(2026, 1, 1), Some(d(2026, 6, 1)), p));
        // Ending the day before is out.
        assert!(!active_in_period(true, d(2026, 1, 1), Some(d(2026, 5, 31)), p));
    }

    #[test]
    fn test_open_ended_window() {
        let p = Period::new(6, 2026).unwrap();
        assert!(active_in_period(true, d(2020, 1, 1), None, p));
    }

    #[test]
    fn test_display() {
        assert_eq!(Period::new(3, 2026).unwrap().to_string(), "2026-03");
    }
}
