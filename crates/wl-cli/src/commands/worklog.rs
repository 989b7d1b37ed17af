//! Worklog command: header fields followed by one line per reported day.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use wl_core::{LineItem, MonthReport};

use crate::commands::build_report;
use crate::{Config, ReportArgs};

#[derive(Debug, Serialize)]
struct Worklog<'a> {
    name: &'a str,
    year: i32,
    month: &'static str,
    total_hours: String,
    items: &'a [LineItem],
}

impl<'a> Worklog<'a> {
    fn new(report: &'a MonthReport, employee_name: &'a str) -> Self {
        Self {
            name: employee_name,
            year: report.period.year(),
            month: report.period.month_name(),
            total_hours: report.totals.total_tagged_hours.to_string(),
            items: &report.line_items,
        }
    }
}

pub fn run<W: Write>(
    writer: &mut W,
    args: &ReportArgs,
    config: &Config,
    today: NaiveDate,
) -> Result<()> {
    let report = build_report(args, config, today)?;
    let worklog = Worklog::new(&report, &config.employee_name);
    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&worklog)?)?;
        return Ok(());
    }
    render(writer, &worklog)
}

fn render<W: Write>(writer: &mut W, worklog: &Worklog<'_>) -> Result<()> {
    writeln!(writer, "Name: {}", worklog.name)?;
    writeln!(writer, "Year: {}", worklog.year)?;
    writeln!(writer, "Month: {}", worklog.month)?;
    writeln!(writer, "Total_hours: {}", worklog.total_hours)?;
    writeln!(writer)?;

    for item in worklog.items {
        let line = format!(
            "{:02}  {:<7}  {}",
            item.day_of_month,
            item.display_value.as_str(),
            item.description
        );
        writeln!(writer, "{}", line.trim_end())?;
    }
    Ok(())
}
