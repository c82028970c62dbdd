//! Tally analysis history.
//!
//! This crate provides:
//! - The persisted history row and its tri-state stationarity flag
//! - An append-only CSV writer that emits the header on first write
//! - A reader for reviewing how the estimates evolved across saves

pub mod format;
pub mod reader;
pub mod record;
pub mod writer;

pub use reader::read_history;
pub use record::{HistoryRecord, StationarityFlag, HISTORY_COLUMNS};
pub use writer::{CsvHistoryWriter, HistoryError, HistorySink, MemorySink};
