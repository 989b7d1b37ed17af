//! Fetch command: save the raw sheet values for offline `--input` runs.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use wl_sheets::ValueRange;

use crate::commands::source::SheetsSource;
use crate::{Config, FetchArgs};

pub fn run<W: Write>(writer: &mut W, args: &FetchArgs, config: &Config) -> Result<()> {
    let values = SheetsSource::new(config).fetch_values()?;
    save_values(&values, &args.output)?;

    let rows = values.values.len().saturating_sub(1);
    writeln!(writer, "Saved {rows} rows to {}", args.output.display())?;
    Ok(())
}

/// Writes atomically by writing to a .tmp file then renaming.
fn save_values(values: &ValueRange, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let content = serde_json::to_string_pretty(values)?;
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, content)
        .with_context(|| format!("failed to write {}", tmp_path.display()))?;

    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err).with_context(|| format!("failed to replace {}", path.display()));
    }

    tracing::debug!(path = %path.display(), "saved sheet values");
    Ok(())
}
