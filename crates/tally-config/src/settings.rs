//! Settings types.
//!
//! Every section and field has a default, so a partial settings.json only
//! needs to name what it overrides.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::validate::ValidationError;

/// Complete settings document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Settings {
    pub schema_version: String,
    pub session: SessionSettings,
    pub analysis: AnalysisSettings,
    pub history: HistorySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            session: SessionSettings::default(),
            analysis: AnalysisSettings::default(),
            history: HistorySettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_json(&content)
    }

    /// Parse settings from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }
}

/// Interval timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SessionSettings {
    /// Length of one collection interval, in ticks (seconds).
    pub interval_secs: u64,
    /// Wall-clock length of one tick in milliseconds.
    pub tick_millis: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            tick_millis: 1000,
        }
    }
}

/// Parameters for the diagnostic snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Window of the centered moving average.
    pub moving_average_window: usize,
    /// Observations per block in the stationarity heuristic.
    pub block_size: usize,
    /// Block-mean coefficient of variation below which the series is
    /// called stationary.
    pub stationarity_threshold: f64,
    /// Upper bound on lags evaluated by the autocorrelation function.
    pub max_acf_lags: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            moving_average_window: 5,
            block_size: 10,
            stationarity_threshold: 0.2,
            max_acf_lags: 10,
        }
    }
}

/// Periodic history persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct HistorySettings {
    pub enabled: bool,
    /// CSV file that receives one row per save.
    pub path: PathBuf,
    /// Save after every `save_every`-th observation.
    pub save_every: u32,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from("tally_history.csv"),
            save_every: 10,
        }
    }
}
