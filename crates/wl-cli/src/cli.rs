//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use clap::{Args, Parser, Subcommand};

/// Monthly worklog reports.
///
/// Reads a daily activity log from Google Sheets and turns its tagged notes
/// into a timesheet grid and a worklog of line items.
#[derive(Debug, Parser)]
#[command(name = "wl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show every day of the month with its value and totals.
    Show(ReportArgs),

    /// Print the timesheet grid and paid weekday hours.
    Timesheet(ReportArgs),

    /// Print the worklog header and line items.
    Worklog(ReportArgs),

    /// Download the activity log and save it for later `--input` runs.
    Fetch(FetchArgs),
}

/// Which month to report on.
#[derive(Debug, Clone, Default, Args)]
pub struct PeriodArgs {
    /// Month number (1-12). Defaults to last month.
    #[arg(short, long)]
    pub month: Option<u32>,

    /// Four-digit year. Defaults to the year of last month.
    #[arg(short, long)]
    pub year: Option<i32>,
}

impl PeriodArgs {
    /// Resolves to `(year, month)`, filling gaps from the month before `today`.
    pub fn resolve(&self, today: NaiveDate) -> (i32, u32) {
        let previous = today
            .with_day(1)
            .and_then(|first| first.pred_opt())
            .unwrap_or(today);
        (
            self.year.unwrap_or_else(|| previous.year()),
            self.month.unwrap_or_else(|| previous.month()),
        )
    }
}

/// Arguments shared by the report commands.
#[derive(Debug, Clone, Default, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub period: PeriodArgs,

    /// Read a saved values file instead of calling Google Sheets.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct FetchArgs {
    /// File to write the raw sheet values to.
    #[arg(short, long)]
    pub output: PathBuf,
}
