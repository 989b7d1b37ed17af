//! CLI subcommand implementations.

pub mod fetch;
pub mod show;
pub mod source;
pub mod timesheet;
pub mod worklog;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use wl_core::{MonthReport, Pipeline};

use crate::{Config, ReportArgs};

/// Runs the pipeline for the month `args` selects, relative to `today`.
pub fn build_report(args: &ReportArgs, config: &Config, today: NaiveDate) -> Result<MonthReport> {
    let pipeline =
        Pipeline::new(config.pipeline_config()).context("invalid keyword configuration")?;
    let (year, month) = args.period.resolve(today);
    let source = source::open(args.input.as_deref(), config);

    let report = pipeline.generate(source.as_ref(), year, month)?;
    if !report.anomalies.is_empty() {
        tracing::info!(
            count = report.anomalies.len(),
            "some notes were not understood; run with -v for details"
        );
    }
    Ok(report)
}
