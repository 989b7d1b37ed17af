//! Month aggregation: merging extracted entries into the calendar skeleton.
//!
//! # Display Rules
//!
//! For each calendar day the first matching rule decides the displayed value:
//!
//! 1. Saturday → `SAT`
//! 2. Sunday → `SUN`
//! 3. Holiday → `Holiday`
//! 4. Tagged entry → its hours token, verbatim
//! 5. Otherwise blank
//!
//! Totals are taken from the extracted entries before these rules apply, so
//! hours logged on a weekend or holiday still count towards the month.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::calendar::{CalendarDay, WeekdayKind};
use crate::extract::{AnomalyKind, ParseAnomaly, TagMatcher};
use crate::record::{Hours, RawDayRecord, TaggedEntry};

/// The value shown for a day in both reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayValue {
    Hours(Hours),
    Saturday,
    Sunday,
    Holiday,
    Blank,
}

impl DisplayValue {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Hours(hours) => hours.as_str(),
            Self::Saturday => "SAT",
            Self::Sunday => "SUN",
            Self::Holiday => "Holiday",
            Self::Blank => "",
        }
    }

    pub fn is_blank(&self) -> bool {
        self.as_str().is_empty()
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DisplayValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// The resolved view of one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatedDay {
    pub date: NaiveDate,
    pub day_of_month: u32,
    pub weekday_kind: WeekdayKind,
    pub display_value: DisplayValue,

    /// Cleaned entry description, blank when no entry was extracted.
    pub description: String,

    pub holiday: bool,
}

/// Month-level figures derived from one aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MonthTotals {
    /// Sum of numeric tagged hours, weekends and holidays included.
    pub total_tagged_hours: Decimal,

    /// Non-weekend days in the month. Holidays count.
    pub billable_weekday_count: u32,
}

impl MonthTotals {
    /// Paid-hours figure: billable weekdays times the per-day multiplier.
    pub fn billable_hours(&self, weekday_hours_multiplier: Decimal) -> Decimal {
        Decimal::from(self.billable_weekday_count) * weekday_hours_multiplier
    }
}

/// Result of aggregating one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthAggregate {
    /// One entry per calendar day, ascending.
    pub days: Vec<AggregatedDay>,
    pub totals: MonthTotals,
    /// Diagnostics, ordered by date.
    pub anomalies: Vec<ParseAnomaly>,
}

/// Merges raw log rows into a calendar using a tag matcher.
#[derive(Debug, Clone, Copy)]
pub struct MonthAggregator<'a> {
    matcher: &'a TagMatcher,
}

impl<'a> MonthAggregator<'a> {
    pub const fn new(matcher: &'a TagMatcher) -> Self {
        Self { matcher }
    }

    /// Aggregates `raw_days` over `calendar`.
    ///
    /// Rows outside the calendar's date span are ignored. Calendar days without
    /// a row are treated as non-holiday days with empty notes. When a date has
    /// several rows the first one is used.
    pub fn aggregate(
        &self,
        raw_days: &[RawDayRecord],
        calendar: &[CalendarDay],
    ) -> MonthAggregate {
        let mut anomalies = Vec::new();
        let by_date = index_rows(raw_days, calendar, &mut anomalies);

        let mut days = Vec::with_capacity(calendar.len());
        let mut total_tagged_hours = Decimal::ZERO;
        let mut billable_weekday_count = 0;

        for day in calendar {
            let (holiday, notes) = by_date
                .get(&day.date)
                .map_or((false, ""), |row| (row.holiday, row.notes.as_str()));

            let extraction = self.matcher.scan(day.date, notes);
            anomalies.extend(extraction.anomalies);
            let entry = extraction.entry;

            if let Some(hours) = entry.as_ref().and_then(|e| e.hours.as_decimal()) {
                total_tagged_hours += hours;
            }
            if !day.weekday_kind.is_weekend() {
                billable_weekday_count += 1;
            }

            let (display_value, description) = match (day.weekday_kind, holiday, entry) {
                (WeekdayKind::Saturday, _, entry) => {
                    (DisplayValue::Saturday, description_of(entry))
                }
                (WeekdayKind::Sunday, _, entry) => (DisplayValue::Sunday, description_of(entry)),
                (WeekdayKind::Weekday, true, entry) => {
                    (DisplayValue::Holiday, description_of(entry))
                }
                (WeekdayKind::Weekday, false, Some(entry)) => {
                    (DisplayValue::Hours(entry.hours), entry.description)
                }
                (WeekdayKind::Weekday, false, None) => (DisplayValue::Blank, String::new()),
            };

            days.push(AggregatedDay {
                date: day.date,
                day_of_month: day.day_of_month,
                weekday_kind: day.weekday_kind,
                display_value,
                description,
                holiday,
            });
        }

        anomalies.sort_by_key(|a| a.date);

        tracing::debug!(
            days = days.len(),
            total_tagged_hours = %total_tagged_hours,
            billable_weekday_count,
            anomalies = anomalies.len(),
            "aggregated month"
        );

        MonthAggregate {
            days,
            totals: MonthTotals {
                total_tagged_hours,
                billable_weekday_count,
            },
            anomalies,
        }
    }
}

fn description_of(entry: Option<TaggedEntry>) -> String {
    entry.map(|e| e.description).unwrap_or_default()
}

/// Indexes the rows that fall inside the calendar by date, first row wins.
fn index_rows<'r>(
    raw_days: &'r [RawDayRecord],
    calendar: &[CalendarDay],
    anomalies: &mut Vec<ParseAnomaly>,
) -> HashMap<NaiveDate, &'r RawDayRecord> {
    let mut by_date = HashMap::new();
    let (Some(first), Some(last)) = (calendar.first(), calendar.last()) else {
        return by_date;
    };

    for row in raw_days
        .iter()
        .filter(|row| row.date >= first.date && row.date <= last.date)
    {
        match by_date.entry(row.date) {
            Entry::Vacant(slot) => {
                slot.insert(row);
            }
            Entry::Occupied(_) => {
                anomalies.push(ParseAnomaly::new(
                    row.date,
                    row.notes.as_str(),
                    AnomalyKind::DuplicateDate,
                ));
            }
        }
    }

    by_date
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CalendarBuilder;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn matcher() -> TagMatcher {
        TagMatcher::new("research", "IRAP").unwrap()
    }

    fn january_2024() -> Vec<CalendarDay> {
        CalendarBuilder::default().build(2024, 1).unwrap()
    }

    const EXAMPLE: &str = "Research: Fixed build pipeline (IRAP) [3.5].";

    #[test]
    fn tagged_weekday_shows_hours() {
        let matcher = matcher();
        let raw = vec![RawDayRecord::new(date(2024, 1, 2), false, EXAMPLE)];
        let result = MonthAggregator::new(&matcher).aggregate(&raw, &january_2024());

        let tuesday = &result.days[1];
        assert_eq!(tuesday.date, date(2024, 1, 2));
        assert_eq!(tuesday.display_value.as_str(), "3.5");
        assert_eq!(tuesday.description, "Fixed build pipeline.");
        assert_eq!(result.totals.total_tagged_hours, dec!(3.5));
    }

    #[test]
    fn weekend_overrides_hours_but_still_counts_in_total() {
        let matcher = matcher();
        let raw = vec![
            RawDayRecord::new(date(2024, 1, 6), false, EXAMPLE),
            RawDayRecord::new(date(2024, 1, 7), false, EXAMPLE),
        ];
        let result = MonthAggregator::new(&matcher).aggregate(&raw, &january_2024());

        assert_eq!(result.days[5].display_value, DisplayValue::Saturday);
        assert_eq!(result.days[5].display_value.as_str(), "SAT");
        assert_eq!(result.days[6].display_value.as_str(), "SUN");
        assert_eq!(result.days[5].description, "Fixed build pipeline.");
        assert_eq!(result.totals.total_tagged_hours, dec!(7.0));
    }

    #[test]
    fn holiday_and_blank_weekdays() {
        let matcher = matcher();
        let raw = vec![
            RawDayRecord::new(date(2024, 1, 1), true, ""),
            RawDayRecord::new(date(2024, 1, 2), false, ""),
        ];
        let result = MonthAggregator::new(&matcher).aggregate(&raw, &january_2024());

        assert_eq!(result.days[0].display_value, DisplayValue::Holiday);
        assert!(result.days[0].holiday);
        assert_eq!(result.days[1].display_value, DisplayValue::Blank);
        assert_eq!(result.days[1].description, "");
        assert_eq!(result.totals.total_tagged_hours, Decimal::ZERO);
    }

    #[test]
    fn holiday_with_entry_displays_holiday_and_counts_hours() {
        let matcher = matcher();
        let raw = vec![RawDayRecord::new(date(2024, 1, 1), true, EXAMPLE)];
        let result = MonthAggregator::new(&matcher).aggregate(&raw, &january_2024());

        assert_eq!(result.days[0].display_value, DisplayValue::Holiday);
        assert_eq!(result.totals.total_tagged_hours, dec!(3.5));
    }

    #[test]
    fn output_covers_calendar_regardless_of_input() {
        let matcher = matcher();
        let aggregator = MonthAggregator::new(&matcher);
        let calendar = january_2024();

        let empty = aggregator.aggregate(&[], &calendar);
        assert_eq!(empty.days.len(), calendar.len());

        let sparse = vec![RawDayRecord::new(date(2024, 1, 15), false, EXAMPLE)];
        assert_eq!(aggregator.aggregate(&sparse, &calendar).days.len(), 31);

        let mut full_year = Vec::new();
        for day in date(2023, 12, 1).iter_days().take(400) {
            full_year.push(RawDayRecord::new(day, false, EXAMPLE));
        }
        let result = aggregator.aggregate(&full_year, &calendar);
        assert_eq!(result.days.len(), 31);
        for (day, cal) in result.days.iter().zip(&calendar) {
            assert_eq!(day.date, cal.date);
        }
    }

    #[test]
    fn rows_outside_month_are_ignored() {
        let matcher = matcher();
        let raw = vec![
            RawDayRecord::new(date(2023, 12, 29), false, EXAMPLE),
            RawDayRecord::new(date(2024, 2, 1), false, EXAMPLE),
        ];
        let result = MonthAggregator::new(&matcher).aggregate(&raw, &january_2024());
        assert_eq!(result.totals.total_tagged_hours, Decimal::ZERO);
        assert!(result.days.iter().all(|d| d.description.is_empty()));
    }

    #[test]
    fn billable_weekdays_include_holidays() {
        let matcher = matcher();
        let raw = vec![RawDayRecord::new(date(2024, 1, 1), true, "")];
        let result = MonthAggregator::new(&matcher).aggregate(&raw, &january_2024());
        assert_eq!(result.totals.billable_weekday_count, 23);
        assert_eq!(result.totals.billable_hours(dec!(7.5)), dec!(172.5));

        let february = CalendarBuilder::default().build(2021, 2).unwrap();
        let result = MonthAggregator::new(&matcher).aggregate(&[], &february);
        assert_eq!(result.totals.billable_weekday_count, 20);
    }

    #[test]
    fn non_numeric_hours_display_verbatim_and_add_nothing() {
        let matcher = matcher();
        let raw = vec![
            RawDayRecord::new(date(2024, 1, 2), false, "Research: reading (IRAP) [TBD]."),
            RawDayRecord::new(date(2024, 1, 3), false, "Research: coding (IRAP) [2]."),
        ];
        let result = MonthAggregator::new(&matcher).aggregate(&raw, &january_2024());
        assert_eq!(result.days[1].display_value.as_str(), "TBD");
        assert_eq!(result.totals.total_tagged_hours, dec!(2));
        assert_eq!(result.anomalies.len(), 1);
        assert_eq!(result.anomalies[0].kind, AnomalyKind::NonNumericHours);
    }

    #[test]
    fn duplicate_rows_keep_first_and_report() {
        let matcher = matcher();
        let raw = vec![
            RawDayRecord::new(date(2024, 1, 2), false, "Research: first (IRAP) [1]."),
            RawDayRecord::new(date(2024, 1, 2), true, "Research: second (IRAP) [5]."),
        ];
        let result = MonthAggregator::new(&matcher).aggregate(&raw, &january_2024());
        assert_eq!(result.days[1].display_value.as_str(), "1");
        assert_eq!(result.totals.total_tagged_hours, dec!(1));
        assert_eq!(result.anomalies[0].kind, AnomalyKind::DuplicateDate);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let matcher = matcher();
        let aggregator = MonthAggregator::new(&matcher);
        let raw = vec![
            RawDayRecord::new(date(2024, 1, 2), false, EXAMPLE),
            RawDayRecord::new(date(2024, 1, 3), true, "Research: broken (IRAP) [1]"),
        ];
        let calendar = january_2024();
        assert_eq!(
            aggregator.aggregate(&raw, &calendar),
            aggregator.aggregate(&raw, &calendar)
        );
    }

    #[test]
    fn empty_calendar_yields_empty_month() {
        let matcher = matcher();
        let raw = vec![RawDayRecord::new(date(2024, 1, 2), false, EXAMPLE)];
        let result = MonthAggregator::new(&matcher).aggregate(&raw, &[]);
        assert!(result.days.is_empty());
        assert_eq!(result.totals, MonthTotals::default());
    }
}
