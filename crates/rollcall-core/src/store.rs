//! Flat CSV persistence — the whole store is read and rewritten per mutation.
//!
//! The store is a shared file under cooperative single-writer access: if
//! another process (a spreadsheet viewer, typically) holds it locked, the
//! operation fails fast with [`StoreError::Unavailable`] rather than
//! corrupting or partially applying data. No retries here; callers own
//! their retry policy.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::record::{AttendanceRecord, COLUMNS};

#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing file could not be opened, read, or replaced.
    #[error("store unavailable: {0}")]
    Unavailable(#[from] std::io::Error),
    /// The file exists but a row does not match the ledger schema.
    #[error("malformed store row: {0}")]
    Malformed(String),
}

impl From<csv::Error> for StoreError {
    fn from(err: csv::Error) -> Self {
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => StoreError::Unavailable(io),
            _ => StoreError::Malformed(message),
        }
    }
}

/// Handle to the attendance CSV file.
///
/// Every operation is a full-file read or rewrite; there is no row-level
/// access. O(rows) per event is accepted for the small daily rosters this
/// serves.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the store with the canonical header and zero rows if absent,
    /// creating parent directories as needed. A no-op when the file already
    /// exists — existing rows are never touched.
    pub fn ensure_exists(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(COLUMNS)?;
        writer.flush()?;
        tracing::info!(path = %self.path.display(), "created attendance store");
        Ok(())
    }

    /// Read every row. A missing file is not special-cased here: the write
    /// path treats it as an error, the query path degrades to "no data".
    pub fn load(&self) -> Result<Vec<AttendanceRecord>, StoreError> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut records = Vec::new();
        for row in reader.deserialize() {
            records.push(row?);
        }
        Ok(records)
    }

    /// Replace the entire store with the given rows.
    pub fn save(&self, records: &[AttendanceRecord]) -> Result<(), StoreError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)?;
        writer.write_record(COLUMNS)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Default store location: `$XDG_DATA_HOME/rollcall/attendance.csv`,
/// falling back to `~/.local/share`.
pub fn default_store_path() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local/share")
        })
        .join("rollcall")
        .join("attendance.csv")
}
