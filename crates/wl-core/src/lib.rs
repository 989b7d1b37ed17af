//! Core pipeline for monthly worklog reports.
//!
//! This crate turns a daily activity log into:
//! - Extraction: tagged `<tag>: description [hours].` entries from free-text notes
//! - Calendar: the weekday/weekend skeleton of a month
//! - Aggregation: per-day display values plus month totals
//! - Assembly: a 31-slot timesheet grid and ordered worklog line items

pub mod aggregate;
pub mod calendar;
pub mod extract;
pub mod period;
mod pipeline;
pub mod record;
pub mod report;

pub use aggregate::{AggregatedDay, DisplayValue, MonthAggregate, MonthAggregator, MonthTotals};
pub use calendar::{CalendarBuilder, CalendarDay, WeekdayKind};
pub use extract::{AnomalyKind, Extraction, MatcherError, ParseAnomaly, TagMatcher};
pub use period::{Period, PeriodError, YearRange};
pub use pipeline::{DaySource, FetchError, MonthReport, Pipeline, PipelineConfig, ReportError};
pub use record::{Hours, RawDayRecord, TaggedEntry};
pub use report::{Assembly, Cell, CellGrid, FILLER, GRID_SLOTS, LineItem, ReportAssembler};
