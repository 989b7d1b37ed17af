//! Where day records come from: Google Sheets or a saved values file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use wl_core::{DaySource, FetchError, RawDayRecord};
use wl_sheets::{Client, ValueRange};

use crate::Config;

/// Reads the activity log through the Sheets API.
#[derive(Debug)]
pub struct SheetsSource {
    sheet_id: Option<String>,
    range: String,
    access_token: Option<String>,
}

impl SheetsSource {
    pub fn new(config: &Config) -> Self {
        Self {
            sheet_id: config.sheet_id.clone(),
            range: config.sheet_range.clone(),
            access_token: config.access_token.clone(),
        }
    }

    /// Fetches the configured range, blocking on a private runtime.
    pub fn fetch_values(&self) -> Result<ValueRange> {
        let sheet_id = non_empty(self.sheet_id.as_deref())
            .ok_or_else(|| anyhow!("missing spreadsheet ID (set WL_SHEET_ID or config.toml)"))?;
        let access_token = non_empty(self.access_token.as_deref())
            .ok_or_else(|| anyhow!("missing access token (set WL_ACCESS_TOKEN or config.toml)"))?;

        let client = Client::new(access_token).context("failed to create Sheets client")?;
        let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
        tracing::debug!(sheet_id, range = %self.range, "fetching sheet values");
        Ok(runtime.block_on(client.fetch_values(sheet_id, &self.range))?)
    }
}

impl DaySource for SheetsSource {
    fn fetch(&self) -> Result<Vec<RawDayRecord>, FetchError> {
        let values = self.fetch_values().map_err(FetchError::new)?;
        values.to_records().map_err(FetchError::new)
    }
}

/// Reads a values file saved by `wl fetch`.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<ValueRange> {
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        ValueRange::from_json(&json)
            .with_context(|| format!("failed to parse {}", self.path.display()))
    }
}

impl DaySource for FileSource {
    fn fetch(&self) -> Result<Vec<RawDayRecord>, FetchError> {
        let values = self.read().map_err(|err| FetchError::new(format!("{err:#}")))?;
        values.to_records().map_err(FetchError::new)
    }
}

/// Picks the saved file when given, Sheets otherwise.
pub fn open(input: Option<&Path>, config: &Config) -> Box<dyn DaySource> {
    match input {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(SheetsSource::new(config)),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
