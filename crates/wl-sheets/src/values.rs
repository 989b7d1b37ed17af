//! Decoding a `values.get` response into day records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use wl_core::RawDayRecord;

use crate::SheetsError;

/// Header of the date column.
pub const DATE_COLUMN: &str = "Date";
/// Header of the holiday checkbox column.
pub const HOLIDAY_COLUMN: &str = "Statutory Holiday";
/// Header of the free-text notes column.
pub const NOTES_COLUMN: &str = "Comments";
/// Format of the formatted date cells, e.g. `Tue, Jan 02 2024`.
pub const DATE_FORMAT: &str = "%a, %b %d %Y";

/// A block of cells as returned by the Sheets API (and as saved by `wl fetch`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,

    /// Rows of cells; the first row is the header.
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

impl ValueRange {
    /// Parses a saved response body.
    pub fn from_json(json: &str) -> Result<Self, SheetsError> {
        serde_json::from_str(json).map_err(|err| SheetsError::InvalidResponse(err.to_string()))
    }

    /// Decodes data rows into day records.
    ///
    /// Rows with a blank date are skipped silently, rows whose date does not
    /// parse are skipped with a warning. Short rows are padded with blanks.
    pub fn to_records(&self) -> Result<Vec<RawDayRecord>, SheetsError> {
        let Some((header, rows)) = self.values.split_first() else {
            tracing::warn!("no data found");
            return Ok(Vec::new());
        };

        let date_col = find_column(header, DATE_COLUMN)?;
        let holiday_col = find_column(header, HOLIDAY_COLUMN)?;
        let notes_col = find_column(header, NOTES_COLUMN)?;

        let mut records = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let date_text = cell_text(row.get(date_col));
            let date_text = date_text.trim();
            if date_text.is_empty() {
                continue;
            }

            let Ok(date) = NaiveDate::parse_from_str(date_text, DATE_FORMAT) else {
                tracing::warn!(
                    row = index + 1,
                    value = date_text,
                    "skipping row with unparseable date"
                );
                continue;
            };

            records.push(RawDayRecord::new(
                date,
                parse_flag(&cell_text(row.get(holiday_col))),
                cell_text(row.get(notes_col)),
            ));
        }

        tracing::debug!(rows = rows.len(), records = records.len(), "decoded sheet rows");
        Ok(records)
    }
}

fn find_column(header: &[Value], name: &'static str) -> Result<usize, SheetsError> {
    header
        .iter()
        .position(|cell| cell_text(Some(cell)).trim().eq_ignore_ascii_case(name))
        .ok_or(SheetsError::MissingColumn { column: name })
}

fn cell_text(cell: Option<&Value>) -> String {
    match cell {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(true)) => "TRUE".to_string(),
        Some(Value::Bool(false)) => "FALSE".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Checkbox-style truthiness: blank and explicit negatives are false.
fn parse_flag(text: &str) -> bool {
    !matches!(
        text.trim().to_lowercase().as_str(),
        "" | "false" | "no" | "n" | "0"
    )
}
