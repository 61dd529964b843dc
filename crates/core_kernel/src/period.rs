//! Reporting periods
//!
//! Ledger reports work on calendar dates. A `DateRange` is inclusive at both
//! ends, which matches how an association's fiscal year is stated
//! (e.g. 2024-04-01 to 2025-03-31).

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to period construction
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("Invalid period: start {start} is after end {end}")]
    InvalidPeriod {
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Invalid fiscal year start month: {0}")]
    InvalidStartMonth(u32),
}

/// An inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the range (inclusive)
    pub start: NaiveDate,
    /// Last day of the range (inclusive)
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::InvalidPeriod` if `start` is after `end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if start > end {
            return Err(PeriodError::InvalidPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    /// Builds the fiscal year that starts on the first day of `start_month`
    /// in `year` and ends the day before the same date one year later.
    pub fn fiscal_year(year: i32, start_month: u32) -> Result<Self, PeriodError> {
        let start = NaiveDate::from_ymd_opt(year, start_month, 1)
            .ok_or(PeriodError::InvalidStartMonth(start_month))?;
        let end = NaiveDate::from_ymd_opt(year + 1, start_month, 1)
            .and_then(|d| d.pred_opt())
            .ok_or(PeriodError::InvalidStartMonth(start_month))?;
        Self::new(start, end)
    }

    /// Returns the fiscal year (by `start_month`) that contains `date`
    pub fn fiscal_year_containing(date: NaiveDate, start_month: u32) -> Result<Self, PeriodError> {
        let year = if date.month() >= start_month {
            date.year()
        } else {
            date.year() - 1
        };
        Self::fiscal_year(year, start_month)
    }

    /// Checks whether a date falls inside the range
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of days covered, counting both ends
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}
