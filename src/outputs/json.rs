//! JSON archive of each run.
//!
//! When an output directory is configured, every run writes what it ranked
//! and what it posted so past posts can be inspected later.
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! ├── 2025-05-05.json
//! ├── 2025-05-08.json
//! └── 2025-05-10.json
//! ```
//!
//! A second run on the same day overwrites that day's file.

use crate::models::RankedSelection;
use chrono::NaiveDate;
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Everything a single run produced.
#[derive(Debug, Serialize)]
pub struct RunArchive<'a> {
    /// The date stamped into the post header, `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// The formatted post text.
    pub post: &'a str,
    /// The ranked stories, best first.
    pub stories: &'a RankedSelection,
}

/// Path of the archive file for `date` under `json_output_dir`.
pub fn archive_path(json_output_dir: &str, date: NaiveDate) -> PathBuf {
    PathBuf::from(json_output_dir).join(format!("{date}.json"))
}

/// Write a [`RunArchive`] as pretty-printed JSON.
///
/// # Returns
///
/// The path written to, or an error if directory creation or the write fails.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_run(
    archive: &RunArchive<'_>,
    json_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(archive)?;

    if let Err(e) = fs::create_dir_all(json_output_dir).await {
        error!(%json_output_dir, error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = archive_path(json_output_dir, archive.date);
    fs::write(&path, json).await?;
    info!(path = %path.display(), stories = archive.stories.len(), "Wrote run archive");

    Ok(path)
}
