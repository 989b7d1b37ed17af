//! End-to-end pipeline: validate → fetch → calendar → aggregate → assemble.
//!
//! Each run derives everything from the records it is given; nothing is
//! carried between runs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aggregate::{AggregatedDay, MonthAggregator, MonthTotals};
use crate::calendar::{CalendarBuilder, CalendarDay};
use crate::extract::{MatcherError, ParseAnomaly, TagMatcher};
use crate::period::{Period, PeriodError, YearRange};
use crate::record::RawDayRecord;
use crate::report::{CellGrid, LineItem, ReportAssembler};

/// Failure reported by a [`DaySource`], passed through unchanged.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct FetchError(Box<dyn std::error::Error + Send + Sync>);

impl FetchError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(source.into())
    }
}

/// Structural failures of a report request.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    InvalidPeriod(#[from] PeriodError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Supplier of raw day rows (spreadsheet, saved file, fixtures).
pub trait DaySource {
    fn fetch(&self) -> Result<Vec<RawDayRecord>, FetchError>;
}

impl DaySource for [RawDayRecord] {
    fn fetch(&self) -> Result<Vec<RawDayRecord>, FetchError> {
        Ok(self.to_vec())
    }
}

impl DaySource for Vec<RawDayRecord> {
    fn fetch(&self) -> Result<Vec<RawDayRecord>, FetchError> {
        Ok(self.clone())
    }
}

/// Business parameters of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Keyword that opens a tagged sub-entry (`<tag>:`).
    pub tag_keyword: String,

    /// Word that must also appear in a qualifying sub-entry.
    pub marker_keyword: String,

    pub supported_years: YearRange,

    /// Paid hours per billable weekday.
    pub weekday_hours_multiplier: Decimal,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tag_keyword: "research".to_string(),
            marker_keyword: "IRAP".to_string(),
            supported_years: YearRange::default(),
            weekday_hours_multiplier: Decimal::new(75, 1),
        }
    }
}

/// Output of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthReport {
    pub period: Period,
    pub days: Vec<AggregatedDay>,
    pub totals: MonthTotals,
    /// `billable_weekday_count × weekday_hours_multiplier`.
    pub billable_hours: Decimal,
    pub grid: CellGrid,
    pub line_items: Vec<LineItem>,
    pub anomalies: Vec<ParseAnomaly>,
}

/// A configured pipeline, reusable across runs.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    matcher: TagMatcher,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, MatcherError> {
        let matcher = TagMatcher::new(&config.tag_keyword, &config.marker_keyword)?;
        Ok(Self { config, matcher })
    }

    /// Validates the period, then fetches from `source` and runs.
    ///
    /// An invalid period is rejected before the source is touched.
    pub fn generate<S>(
        &self,
        source: &S,
        year: i32,
        month: u32,
    ) -> Result<MonthReport, ReportError>
    where
        S: DaySource + ?Sized,
    {
        let period = Period::new(year, month, self.config.supported_years)?;
        let raw_days = source.fetch()?;
        tracing::debug!(%period, rows = raw_days.len(), "fetched day records");
        Ok(self.run_period(&raw_days, period))
    }

    /// Runs over records already in hand.
    pub fn run(
        &self,
        raw_days: &[RawDayRecord],
        year: i32,
        month: u32,
    ) -> Result<MonthReport, ReportError> {
        let period = Period::new(year, month, self.config.supported_years)?;
        Ok(self.run_period(raw_days, period))
    }

    fn run_period(&self, raw_days: &[RawDayRecord], period: Period) -> MonthReport {
        let calendar = CalendarBuilder::days(period);
        self.assemble(raw_days, period, &calendar)
    }

    fn assemble(
        &self,
        raw_days: &[RawDayRecord],
        period: Period,
        calendar: &[CalendarDay],
    ) -> MonthReport {
        let aggregate = MonthAggregator::new(&self.matcher).aggregate(raw_days, calendar);
        let assembly = ReportAssembler::assemble(&aggregate.days, aggregate.totals);

        MonthReport {
            period,
            billable_hours: assembly
                .totals
                .billable_hours(self.config.weekday_hours_multiplier),
            days: aggregate.days,
            totals: assembly.totals,
            grid: assembly.grid,
            line_items: assembly.line_items,
            anomalies: aggregate.anomalies,
        }
    }
}
