//! Google Sheets fetch for worklog reports.
//!
//! Reads one block of the activity log through the Sheets v4 `values.get`
//! endpoint and decodes it into [`wl_core::RawDayRecord`]s. Obtaining and
//! refreshing the OAuth access token is the caller's concern.

use std::fmt;
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

mod values;

pub use values::{DATE_COLUMN, DATE_FORMAT, HOLIDAY_COLUMN, NOTES_COLUMN, ValueRange};

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const SHEETS_API_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Sheets client errors.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// The provided access token was invalid.
    #[error("invalid access token: {reason}")]
    InvalidToken { reason: &'static str },
    /// The spreadsheet ID was empty.
    #[error("spreadsheet ID cannot be empty")]
    EmptySheetId,
    /// The API base URL could not be used.
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned an error response.
    #[error("API error: {message}")]
    Api { message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// A required header is absent from the first row.
    #[error("missing column: {column}")]
    MissingColumn { column: &'static str },
}

/// Sheets API client.
///
/// Safe to clone and share across threads; clones share the connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("access_token", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new client with the given OAuth access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or whitespace-only, or if
    /// the HTTP client fails to build.
    pub fn new(access_token: impl Into<String>) -> Result<Self, SheetsError> {
        let access_token = access_token.into();

        if access_token.is_empty() {
            return Err(SheetsError::InvalidToken {
                reason: "access token cannot be empty",
            });
        }
        if access_token.trim().is_empty() {
            return Err(SheetsError::InvalidToken {
                reason: "access token cannot be whitespace-only",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(SheetsError::ClientBuild)?;

        Ok(Self {
            http,
            access_token,
            base_url: SHEETS_API_URL.to_string(),
        })
    }

    /// Points the client at a different API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetches the raw cell block for `range` (e.g. `A3:Q368`).
    pub async fn fetch_values(
        &self,
        sheet_id: &str,
        range: &str,
    ) -> Result<ValueRange, SheetsError> {
        let url = self.values_url(sheet_id, range)?;
        tracing::debug!(%url, "retrieving sheet data");

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(parse_api_error(&body).unwrap_or_else(|| SheetsError::Api {
                message: format!("status {status}: {body}"),
            }));
        }

        ValueRange::from_json(&body)
    }

    fn values_url(&self, sheet_id: &str, range: &str) -> Result<Url, SheetsError> {
        let sheet_id = sheet_id.trim();
        if sheet_id.is_empty() {
            return Err(SheetsError::EmptySheetId);
        }

        let mut url =
            Url::parse(&self.base_url).map_err(|err| SheetsError::InvalidUrl(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| SheetsError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend([sheet_id, "values", range]);
        Ok(url)
    }
}

fn parse_api_error(body: &str) -> Option<SheetsError> {
    #[derive(Deserialize)]
    struct ErrorPayload {
        error: ErrorDetails,
    }

    #[derive(Deserialize)]
    struct ErrorDetails {
        message: String,
    }

    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .map(|payload| SheetsError::Api {
            message: payload.error.message,
        })
}
