//! Year-week period identifiers.
//!
//! Extracts carry the period either as an integer `YYYYWW` or as a string in
//! one of the common spellings (`202451`, `2024-51`, `2024W51`, `2024-W51`).
//! Everything is normalized to the integer key so periods sort numerically.

use crate::error::{DataError, Result};
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest week number a year can carry.
pub const MAX_WEEK: u32 = 53;

/// A (year, week) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearWeek {
    /// Calendar year.
    pub year: i32,
    /// Week within the year, 1-based.
    pub week: u32,
}

impl YearWeek {
    /// Create a period, validating the week number.
    pub fn new(year: i32, week: u32) -> Result<Self> {
        if !(1000..=9999).contains(&year) || week == 0 || week > MAX_WEEK {
            return Err(DataError::InvalidYearWeek(format!("{year}-{week:02}")));
        }
        Ok(Self { year, week })
    }

    /// Decode an integer `YYYYWW` key.
    pub fn from_key(key: i64) -> Result<Self> {
        let year = i32::try_from(key / 100)
            .map_err(|_| DataError::InvalidYearWeek(key.to_string()))?;
        let week = u32::try_from(key % 100)
            .map_err(|_| DataError::InvalidYearWeek(key.to_string()))?;
        Self::new(year, week).map_err(|_| DataError::InvalidYearWeek(key.to_string()))
    }

    /// Integer `YYYYWW` key. Ordering of keys matches ordering of periods.
    pub const fn key(&self) -> i64 {
        self.year as i64 * 100 + self.week as i64
    }

    /// Monday of the ISO week, if the week exists in that ISO year.
    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon)
    }
}

impl FromStr for YearWeek {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || DataError::InvalidYearWeek(s.to_string());
        let trimmed = s.trim();

        // Plain digits: YYYYWW
        if trimmed.len() == 6 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            let key: i64 = trimmed.parse().map_err(|_| invalid())?;
            return Self::from_key(key).map_err(|_| invalid());
        }

        if trimmed.len() < 6 || !trimmed.is_char_boundary(4) {
            return Err(invalid());
        }
        let (year_part, rest) = trimmed.split_at(4);
        let week_part = rest
            .strip_prefix("-W")
            .or_else(|| rest.strip_prefix("-w"))
            .or_else(|| rest.strip_prefix('-'))
            .or_else(|| rest.strip_prefix('W'))
            .or_else(|| rest.strip_prefix('w'))
            .ok_or_else(invalid)?;

        if week_part.is_empty() || week_part.len() > 2 {
            return Err(invalid());
        }
        let year: i32 = year_part.parse().map_err(|_| invalid())?;
        let week: u32 = week_part.parse().map_err(|_| invalid())?;
        Self::new(year, week).map_err(|_| invalid())
    }
}

impl fmt::Display for YearWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}
