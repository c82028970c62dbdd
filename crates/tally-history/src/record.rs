//! Persisted history row.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::format::join_row;

/// Header row of the history file, in column order.
pub const HISTORY_COLUMNS: [&str; 8] = [
    "Date",
    "Time",
    "Nb_minutes",
    "Lambda",
    "Variance",
    "Autocorr(1)",
    "Stationarity",
    "Series",
];

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Stationarity column value.
///
/// One mapping for all writers: stationary → `yes`, non-stationary → `no`,
/// undetermined → empty field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationarityFlag {
    Yes,
    No,
    Unknown,
}

impl StationarityFlag {
    pub fn as_field(self) -> &'static str {
        match self {
            StationarityFlag::Yes => "yes",
            StationarityFlag::No => "no",
            StationarityFlag::Unknown => "",
        }
    }

    pub fn from_field(field: &str) -> Option<Self> {
        match field.trim() {
            "yes" => Some(StationarityFlag::Yes),
            "no" => Some(StationarityFlag::No),
            "" => Some(StationarityFlag::Unknown),
            _ => None,
        }
    }
}

/// One saved analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Local wall-clock time of the save.
    pub recorded_at: NaiveDateTime,
    /// Number of observations analyzed.
    pub observation_count: usize,
    pub lambda: f64,
    pub variance: f64,
    pub autocorrelation: Option<f64>,
    pub stationarity: StationarityFlag,
    /// The full observation sequence at save time.
    pub series: Vec<u64>,
}

impl HistoryRecord {
    /// Column values, rounded to 3 decimals.
    pub fn to_fields(&self) -> [String; 8] {
        [
            self.recorded_at.format(DATE_FORMAT).to_string(),
            self.recorded_at.format(TIME_FORMAT).to_string(),
            self.observation_count.to_string(),
            format!("{:.3}", self.lambda),
            format!("{:.3}", self.variance),
            self.autocorrelation
                .map(|r| format!("{:.3}", r))
                .unwrap_or_default(),
            self.stationarity.as_field().to_string(),
            series_literal(&self.series),
        ]
    }

    /// The record as one CSV line (no terminator).
    pub fn to_csv_line(&self) -> String {
        join_row(&self.to_fields())
    }
}

/// Render a sequence as a list literal: `[1, 0, 2]`.
pub fn series_literal(series: &[u64]) -> String {
    let items: Vec<String> = series.iter().map(u64::to_string).collect();
    format!("[{}]", items.join(", "))
}

/// Parse a list literal produced by [`series_literal`].
pub fn parse_series_literal(text: &str) -> Option<Vec<u64>> {
    let inner = text.trim().strip_prefix('[')?.strip_suffix(']')?.trim();
    if inner.is_empty() {
        return Some(Vec::new());
    }
    inner
        .split(',')
        .map(|item| item.trim().parse::<u64>().ok())
        .collect()
}
