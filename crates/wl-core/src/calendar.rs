//! Calendar skeleton for a reporting month.
//!
//! The calendar is a pure function of (year, month) and never looks at log
//! content. Aggregation fills it in afterwards.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::period::{Period, PeriodError, YearRange};

/// How a calendar day is treated for display and billing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekdayKind {
    Weekday,
    Saturday,
    Sunday,
}

impl WeekdayKind {
    pub const fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sat => Self::Saturday,
            Weekday::Sun => Self::Sunday,
            _ => Self::Weekday,
        }
    }

    pub const fn is_weekend(self) -> bool {
        matches!(self, Self::Saturday | Self::Sunday)
    }
}

/// One day of the target month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub day_of_month: u32,
    pub weekday_kind: WeekdayKind,
}

impl CalendarDay {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            day_of_month: date.day(),
            weekday_kind: WeekdayKind::from_weekday(date.weekday()),
        }
    }
}

/// Builds calendar skeletons within a supported year range.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarBuilder {
    years: YearRange,
}

impl CalendarBuilder {
    pub const fn new(years: YearRange) -> Self {
        Self { years }
    }

    /// Validates the request and enumerates every day in it.
    pub fn build(&self, year: i32, month: u32) -> Result<Vec<CalendarDay>, PeriodError> {
        let period = Period::new(year, month, self.years)?;
        Ok(Self::days(period))
    }

    /// Enumerates every day of an already-validated period, in ascending order.
    pub fn days(period: Period) -> Vec<CalendarDay> {
        period
            .first_day()
            .iter_days()
            .take_while(|date| period.contains(*date))
            .map(CalendarDay::new)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> CalendarBuilder {
        CalendarBuilder::new(YearRange::default())
    }

    #[test]
    fn length_matches_days_in_month_for_every_month() {
        for year in [2020, 2021, 2024, 2100] {
            for month in 1..=12 {
                let days = builder().build(year, month).unwrap();
                let period = Period::new(year, month, YearRange::default()).unwrap();
                assert_eq!(days.len() as u32, period.days_in_month(), "{period}");
            }
        }
    }

    #[test]
    fn days_are_strictly_ascending_and_start_at_one() {
        let days = builder().build(2024, 3).unwrap();
        assert_eq!(days[0].day_of_month, 1);
        assert_eq!(days.last().unwrap().day_of_month, 31);
        for pair in days.windows(2) {
            assert!(pair[0].date < pair[1].date);
            assert_eq!(pair[0].day_of_month + 1, pair[1].day_of_month);
        }
    }

    #[test]
    fn classifies_weekends() {
        // 2024-01-01 is a Monday.
        let days = builder().build(2024, 1).unwrap();
        assert_eq!(days[0].weekday_kind, WeekdayKind::Weekday);
        assert_eq!(days[5].weekday_kind, WeekdayKind::Saturday);
        assert_eq!(days[6].weekday_kind, WeekdayKind::Sunday);
        assert_eq!(days[7].weekday_kind, WeekdayKind::Weekday);
    }

    #[test]
    fn february_2021_has_28_days() {
        let days = builder().build(2021, 2).unwrap();
        assert_eq!(days.len(), 28);
        assert_eq!(
            days.last().unwrap().date,
            NaiveDate::from_ymd_opt(2021, 2, 28).unwrap()
        );
    }

    #[test]
    fn invalid_period_rejected() {
        assert!(matches!(
            builder().build(2021, 13),
            Err(PeriodError::InvalidMonth { month: 13 })
        ));
        assert!(matches!(
            builder().build(2019, 12),
            Err(PeriodError::UnsupportedYear { year: 2019, .. })
        ));
    }

    #[test]
    fn custom_year_range_bounds_the_builder() {
        let builder = CalendarBuilder::new(YearRange::new(1999, 2000).unwrap());
        assert_eq!(builder.build(1999, 12).unwrap().len(), 31);
        assert!(matches!(
            builder.build(2020, 1),
            Err(PeriodError::UnsupportedYear { year: 2020, min: 1999, max: 2000 })
        ));
    }

    #[test]
    fn build_is_restartable() {
        assert_eq!(builder().build(2022, 7), builder().build(2022, 7));
    }
}
