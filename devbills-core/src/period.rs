//! The (month, year) window a view is showing.

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::time::today_in;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodError {
    #[error("invalid month {0} (expected 1-12)")]
    InvalidMonth(u32),
    #[error("year {0} has no neighbouring year")]
    YearOutOfRange(i32),
}

/// A calendar month. Month is always in 1..=12; year is unrestricted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Period {
    month: u32,
    year: i32,
}

impl Period {
    pub fn new(month: u32, year: i32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth(month));
        }
        Ok(Self { month, year })
    }

    /// The month containing `now` in the given timezone.
    pub fn current(tz: Tz, now: DateTime<Utc>) -> Self {
        let today = today_in(tz, now);
        Self {
            month: today.month(),
            year: today.year(),
        }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Fails only past the last representable year.
    pub fn next(&self) -> Result<Self, PeriodError> {
        if self.month < 12 {
            return Ok(Self { month: self.month + 1, year: self.year });
        }
        let year = self
            .year
            .checked_add(1)
            .ok_or(PeriodError::YearOutOfRange(self.year))?;
        Ok(Self { month: 1, year })
    }

    /// Fails only before the first representable year.
    pub fn prev(&self) -> Result<Self, PeriodError> {
        if self.month > 1 {
            return Ok(Self { month: self.month - 1, year: self.year });
        }
        let year = self
            .year
            .checked_sub(1)
            .ok_or(PeriodError::YearOutOfRange(self.year))?;
        Ok(Self { month: 12, year })
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    /// e.g. "March 2024"
    pub fn label(&self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Years offered by the month/year picker: five either side of `around`,
/// fewer at the ends of the `i32` range.
pub fn selectable_years(around: i32) -> Vec<i32> {
    (around.saturating_sub(5)..=around.saturating_add(5)).collect()
}
