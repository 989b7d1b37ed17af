//! Show command: every day of the month, its value and the month totals.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use wl_core::MonthReport;

use crate::commands::build_report;
use crate::{Config, ReportArgs};

pub fn run<W: Write>(
    writer: &mut W,
    args: &ReportArgs,
    config: &Config,
    today: NaiveDate,
) -> Result<()> {
    let report = build_report(args, config, today)?;
    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }
    render(writer, &report)
}

fn render<W: Write>(writer: &mut W, report: &MonthReport) -> Result<()> {
    writeln!(
        writer,
        "{} {} {}",
        report.period,
        report.period.month_name(),
        report.period.year()
    )?;
    writeln!(writer)?;

    for day in &report.days {
        let line = format!(
            "{}  {}  {:<7}  {}",
            day.date,
            day.date.format("%a"),
            day.display_value.as_str(),
            day.description
        );
        writeln!(writer, "{}", line.trim_end())?;
    }

    writeln!(writer)?;
    writeln!(writer, "Tagged hours: {}", report.totals.total_tagged_hours)?;
    writeln!(writer, "Billable weekdays: {}", report.totals.billable_weekday_count)?;
    writeln!(writer, "Paid hours: {}", report.billable_hours)?;

    if !report.anomalies.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Unread notes:")?;
        for anomaly in &report.anomalies {
            writeln!(writer, "- {} {}: {}", anomaly.date, anomaly.kind, anomaly.line)?;
        }
    }

    Ok(())
}
