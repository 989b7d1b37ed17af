//! Timesheet command: the 31-slot grid laid out the way the paper form is.
//!
//! The form holds days in four columns of eight rows starting at row 18:
//! days 1-8 in D18-D25, 9-16 in G18-G25, 17-24 in J18-J25 and 25-31 in
//! M18-M24. Paid weekday hours go in I28; the header takes the employee name
//! (E10), month name (K10) and year (N10).

use std::collections::BTreeMap;
use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use wl_core::{GRID_SLOTS, MonthReport};

use crate::commands::build_report;
use crate::{Config, ReportArgs};

const FIRST_ROW: u32 = 18;
const ROWS_PER_COLUMN: u32 = 8;
const DAY_COLUMNS: [char; 4] = ['D', 'G', 'J', 'M'];
const PAID_HOURS_CELL: &str = "I28";
const NAME_CELL: &str = "E10";
const MONTH_CELL: &str = "K10";
const YEAR_CELL: &str = "N10";

/// Form cell holding `day`, e.g. `G19` for the 10th.
pub fn cell_address(day: u32) -> Option<String> {
    if !(1..=GRID_SLOTS).contains(&day) {
        return None;
    }
    let index = day - 1;
    let column = DAY_COLUMNS.get(usize::try_from(index / ROWS_PER_COLUMN).ok()?)?;
    Some(format!("{column}{}", FIRST_ROW + index % ROWS_PER_COLUMN))
}

pub fn run<W: Write>(
    writer: &mut W,
    args: &ReportArgs,
    config: &Config,
    today: NaiveDate,
) -> Result<()> {
    let report = build_report(args, config, today)?;
    if args.json {
        let cells = form_cells(&report, &config.employee_name);
        writeln!(writer, "{}", serde_json::to_string_pretty(&cells)?)?;
        return Ok(());
    }
    render(writer, &report, &config.employee_name)
}

/// Every filled form cell keyed by address.
fn form_cells(report: &MonthReport, employee_name: &str) -> BTreeMap<String, String> {
    let mut cells = BTreeMap::new();
    cells.insert(NAME_CELL.to_string(), employee_name.to_string());
    cells.insert(MONTH_CELL.to_string(), report.period.month_name().to_string());
    cells.insert(YEAR_CELL.to_string(), report.period.year().to_string());
    cells.insert(PAID_HOURS_CELL.to_string(), report.billable_hours.to_string());
    for (day, cell) in report.grid.iter() {
        if let Some(address) = cell_address(day) {
            cells.insert(address, cell.as_str().to_string());
        }
    }
    cells
}

fn render<W: Write>(writer: &mut W, report: &MonthReport, employee_name: &str) -> Result<()> {
    writeln!(
        writer,
        "Timesheet: {employee_name}, {} {}",
        report.period.month_name(),
        report.period.year()
    )?;
    writeln!(writer)?;

    for row in 0..ROWS_PER_COLUMN {
        let line = (0..4)
            .map(|column| column * ROWS_PER_COLUMN + row + 1)
            .filter_map(|day| {
                let address = cell_address(day)?;
                let value = report.grid.get(day)?.as_str();
                Some(format!("{address} {day:>2} {value:<7}"))
            })
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(writer, "{}", line.trim_end())?;
    }

    writeln!(writer)?;
    writeln!(writer, "Paid hours ({PAID_HOURS_CELL}): {}", report.billable_hours)?;
    Ok(())
}
