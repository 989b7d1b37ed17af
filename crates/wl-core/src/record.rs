//! Day records flowing into and out of extraction.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row from the daily activity log, as handed over by the fetch step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDayRecord {
    pub date: NaiveDate,

    #[serde(default)]
    pub holiday: bool,

    /// Free text; each line is a separate sub-entry.
    #[serde(default)]
    pub notes: String,
}

impl RawDayRecord {
    pub fn new(date: NaiveDate, holiday: bool, notes: impl Into<String>) -> Self {
        Self {
            date,
            holiday,
            notes: notes.into(),
        }
    }
}

/// Hours token exactly as written between the brackets, trimmed.
///
/// The token is not required to be numeric; see [`Hours::as_decimal`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hours(String);

impl Hours {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric interpretation of the token, if it has one.
    pub fn as_decimal(&self) -> Option<Decimal> {
        Decimal::from_str(self.0.trim()).ok()
    }
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A qualifying sub-entry extracted from one day's notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaggedEntry {
    pub date: NaiveDate,

    /// Cleaned description, always ending in a period.
    pub description: String,

    pub hours: Hours,
}
