//! On-demand export of the progress record.
//!
//! JSON export writes the full record, pretty-printed. CSV export writes the
//! history list only, one row per session, newest first.

use crate::{HistoryEntry, ProgressState, Result};
use std::fs::File;
use std::path::Path;

/// Default file name for a JSON export
pub const DEFAULT_EXPORT_FILE: &str = "fitflex-progress.json";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }
}

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    date: String,
    workout: String,
    workout_id: Option<String>,
    calories: u32,
    seconds: u32,
    session_id: Option<String>,
}

impl From<&HistoryEntry> for CsvRow {
    fn from(entry: &HistoryEntry) -> Self {
        CsvRow {
            date: entry.date.format("%Y-%m-%d").to_string(),
            workout: entry.workout.clone(),
            workout_id: entry.workout_id.clone(),
            calories: entry.calories,
            seconds: entry.seconds,
            session_id: entry.session_id.map(|id| id.to_string()),
        }
    }
}

/// Write the record to `path` in the given format, replacing any file there.
///
/// Returns the number of history entries written.
pub fn export(state: &ProgressState, path: &Path, format: ExportFormat) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    match format {
        ExportFormat::Json => export_json(state, path)?,
        ExportFormat::Csv => export_history_csv(state, path)?,
    }

    tracing::info!("Exported {} history entries to {:?}", state.history.len(), path);
    Ok(state.history.len())
}

fn export_json(state: &ProgressState, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(&file, state)?;
    file.sync_all()?;
    Ok(())
}

fn export_history_csv(state: &ProgressState, path: &Path) -> Result<()> {
    // Headers written by hand so an empty history still gets them
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record([
        "date",
        "workout",
        "workout_id",
        "calories",
        "seconds",
        "session_id",
    ])?;

    for entry in &state.history {
        writer.serialize(CsvRow::from(entry))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;
    Ok(())
}
