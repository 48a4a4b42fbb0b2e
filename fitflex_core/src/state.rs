//! Progress record persistence with file locking.
//!
//! The record is always written whole: serialized to a temp file next to the
//! target under an exclusive lock, synced, then renamed over the old file.
//! Anything unreadable on load degrades to defaults.

use crate::{Error, ProgressState, Result};
use chrono::NaiveDate;
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Read a whole file under a shared lock, `None` on any failure
fn read_locked(path: &Path, what: &str) -> Option<String> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!("Unable to open {} {:?}: {}. Using defaults.", what, path, e);
            return None;
        }
    };

    if let Err(e) = file.lock_shared() {
        tracing::warn!("Unable to lock {} {:?}: {}. Using defaults.", what, path, e);
        return None;
    }

    let mut contents = String::new();
    let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
    let _ = file.unlock();

    match read {
        Ok(_) => Some(contents),
        Err(e) => {
            tracing::warn!("Failed to read {} {:?}: {}. Using defaults.", what, path, e);
            None
        }
    }
}

/// Atomically replace `path` with `contents`
fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::Other, "state path missing parent")
    })?;
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        writer.write_all(contents)?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

impl ProgressState {
    /// Load the record from a file with shared locking
    ///
    /// Returns default state if the file doesn't exist or cannot be parsed.
    /// The week window of a defaulted record is empty; callers normalize it.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::load_stored(path).unwrap_or_default())
    }

    /// Load the record only if a readable one is on disk
    ///
    /// `None` means the caller is starting from scratch: the file is missing,
    /// empty, unreadable or not a valid record.
    pub fn load_stored(path: &Path) -> Option<Self> {
        if !path.exists() {
            tracing::info!("No progress file found, using default state");
            return None;
        }

        let contents = read_locked(path, "progress file")?;
        match serde_json::from_str::<ProgressState>(&contents) {
            Ok(state) => {
                tracing::debug!("Loaded progress from {:?}", path);
                Some(state)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse progress file {:?}: {}. Using defaults.",
                    path,
                    e
                );
                None
            }
        }
    }

    /// Save the full record, replacing whatever was there
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string(self)?;
        write_atomic(path, contents.as_bytes())?;
        tracing::debug!("Saved progress to {:?}", path);
        Ok(())
    }

    /// Delete the persisted record. Missing files are not an error.
    pub fn remove(path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Ok(()) => {
                tracing::info!("Removed progress file {:?}", path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Read the last-active-date marker (`YYYY-MM-DD`).
///
/// A missing or unparsable marker reads as `None`.
pub fn load_day_marker(path: &Path) -> Option<NaiveDate> {
    if !path.exists() {
        return None;
    }

    let contents = read_locked(path, "day marker")?;
    match NaiveDate::parse_from_str(contents.trim(), "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::warn!("Ignoring unparsable day marker {:?}: {}", path, e);
            None
        }
    }
}

pub fn save_day_marker(path: &Path, date: NaiveDate) -> Result<()> {
    write_atomic(path, date.format("%Y-%m-%d").to_string().as_bytes())?;
    tracing::debug!("Saved day marker {} to {:?}", date, path);
    Ok(())
}
