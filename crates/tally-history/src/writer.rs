//! Append-only history writers.
//!
//! The CSV file is never rewritten: each save opens it in append mode,
//! writes the header only if the file is new or empty, then the row.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::format::join_row;
use crate::record::{HistoryRecord, HISTORY_COLUMNS};

/// Errors from history operations.
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed history line {line}: {message}")]
    Malformed { line: usize, message: String },
}

impl HistoryError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        HistoryError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Destination for saved analyses.
pub trait HistorySink {
    /// Persist one record.
    fn append(&mut self, record: &HistoryRecord) -> Result<(), HistoryError>;

    /// Human-readable location, for log messages.
    fn describe(&self) -> String;
}

/// CSV file sink.
#[derive(Debug, Clone)]
pub struct CsvHistoryWriter {
    path: PathBuf,
}

impl CsvHistoryWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvHistoryWriter { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistorySink for CsvHistoryWriter {
    fn append(&mut self, record: &HistoryRecord) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| HistoryError::io(parent, e))?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| HistoryError::io(&self.path, e))?;

        let is_new = file
            .metadata()
            .map_err(|e| HistoryError::io(&self.path, e))?
            .len()
            == 0;

        let mut chunk = String::new();
        if is_new {
            debug!(path = %self.path.display(), "writing history header");
            chunk.push_str(&join_row(&HISTORY_COLUMNS));
            chunk.push('\n');
        }
        chunk.push_str(&record.to_csv_line());
        chunk.push('\n');

        file.write_all(chunk.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| HistoryError::io(&self.path, e))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory sink.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub records: Vec<HistoryRecord>,
}

impl HistorySink for MemorySink {
    fn append(&mut self, record: &HistoryRecord) -> Result<(), HistoryError> {
        self.records.push(record.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        format!("memory ({} records)", self.records.len())
    }
}
