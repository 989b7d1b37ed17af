//! Reporting period validation.

use std::fmt;

use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors for requests that name a month the pipeline cannot report on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PeriodError {
    /// Month number outside 1..=12.
    #[error("invalid month {month}: expected 1-12")]
    InvalidMonth { month: u32 },

    /// Year outside the configured supported range.
    #[error("unsupported year {year}: supported range is {min}-{max}")]
    UnsupportedYear { year: i32, min: i32, max: i32 },

    /// The configured range itself is inverted.
    #[error("invalid supported year range: {min} is after {max}")]
    InvertedRange { min: i32, max: i32 },

    /// The year lies beyond the dates the calendar can represent.
    #[error("year {year} is outside the representable calendar")]
    YearOutOfCalendar { year: i32 },
}

/// Inclusive range of years the pipeline accepts.
///
/// Always ordered and within the representable calendar; deserializing goes
/// through [`YearRange::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawYearRange")]
pub struct YearRange {
    min: i32,
    max: i32,
}

#[derive(Deserialize)]
struct RawYearRange {
    min: i32,
    max: i32,
}

impl TryFrom<RawYearRange> for YearRange {
    type Error = PeriodError;

    fn try_from(raw: RawYearRange) -> Result<Self, Self::Error> {
        Self::new(raw.min, raw.max)
    }
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Result<Self, PeriodError> {
        if min > max {
            return Err(PeriodError::InvertedRange { min, max });
        }
        for year in [min, max] {
            if year < NaiveDate::MIN.year() || year > NaiveDate::MAX.year() {
                return Err(PeriodError::YearOutOfCalendar { year });
            }
        }
        Ok(Self { min, max })
    }

    pub const fn min(&self) -> i32 {
        self.min
    }

    pub const fn max(&self) -> i32 {
        self.max
    }

    pub const fn contains(&self, year: i32) -> bool {
        year >= self.min && year <= self.max
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            min: 2020,
            max: 2100,
        }
    }
}

/// A validated (year, month) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Period {
    year: i32,
    month: u32,
    #[serde(skip)]
    first_day: NaiveDate,
}

impl Period {
    /// Validates `month` and checks `year` against `range`.
    pub fn new(year: i32, month: u32, range: YearRange) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth { month });
        }
        if !range.contains(year) {
            return Err(PeriodError::UnsupportedYear {
                year,
                min: range.min,
                max: range.max,
            });
        }
        let first_day = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(PeriodError::YearOutOfCalendar { year })?;
        Ok(Self {
            year,
            month,
            first_day,
        })
    }

    pub const fn year(self) -> i32 {
        self.year
    }

    pub const fn month(self) -> u32 {
        self.month
    }

    /// First day of the period.
    pub const fn first_day(self) -> NaiveDate {
        self.first_day
    }

    /// Number of days in the period's month.
    pub fn days_in_month(self) -> u32 {
        match self.month {
            4 | 6 | 9 | 11 => 30,
            2 if NaiveDate::from_ymd_opt(self.year, 2, 29).is_some() => 29,
            2 => 28,
            _ => 31,
        }
    }

    /// Whether `date` falls inside this period.
    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// English month name (e.g. "February").
    pub fn month_name(self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map_or("", |m| m.name())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
