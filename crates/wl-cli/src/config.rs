//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use wl_core::{PipelineConfig, YearRange};

/// The first year block of the activity log (one row per day).
const DEFAULT_SHEET_RANGE: &str = "A3:Q368";

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Name printed in the worklog header.
    pub employee_name: String,

    /// Google Sheets spreadsheet ID of the activity log.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_id: Option<String>,

    /// A1 range holding the header row and one year of days.
    pub sheet_range: String,

    /// OAuth access token for the Sheets API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    pub tag_keyword: String,
    pub marker_keyword: String,
    pub supported_years: YearRange,
    pub weekday_hours_multiplier: Decimal,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("employee_name", &self.employee_name)
            .field("sheet_id", &self.sheet_id)
            .field("sheet_range", &self.sheet_range)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("tag_keyword", &self.tag_keyword)
            .field("marker_keyword", &self.marker_keyword)
            .field("supported_years", &self.supported_years)
            .field("weekday_hours_multiplier", &self.weekday_hours_multiplier)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let pipeline = PipelineConfig::default();
        Self {
            employee_name: String::new(),
            sheet_id: None,
            sheet_range: DEFAULT_SHEET_RANGE.to_string(),
            access_token: None,
            tag_keyword: pipeline.tag_keyword,
            marker_keyword: pipeline.marker_keyword,
            supported_years: pipeline.supported_years,
            weekday_hours_multiplier: pipeline.weekday_hours_multiplier,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // WL_EMPLOYEE_NAME, WL_SHEET_ID, WL_ACCESS_TOKEN, ...
        figment = figment.merge(Env::prefixed("WL_"));

        figment.extract()
    }

    /// Business parameters handed to the pipeline.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            tag_keyword: self.tag_keyword.clone(),
            marker_keyword: self.marker_keyword.clone(),
            supported_years: self.supported_years,
            weekday_hours_multiplier: self.weekday_hours_multiplier,
        }
    }
}

/// Returns the platform-specific config directory for wl.
///
/// On Linux: `~/.config/wl`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("wl"))
}
