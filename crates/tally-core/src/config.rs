//! Runtime options for a collection session.
//!
//! Bridges the validated settings file and the `run` flags into the values
//! the coordinator and the session loop need.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use tally_config::Settings;

use crate::analysis::AnalysisParams;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionOptions {
    pub interval_secs: u64,
    /// Wall-clock length of one timer tick.
    #[serde(with = "millis")]
    pub tick: Duration,
    /// History file, or `None` when history is disabled.
    pub history_path: Option<PathBuf>,
    pub save_every: u32,
    pub analysis: AnalysisParams,
}

/// Command-line overrides for `tally run`.
#[derive(Debug, Clone, Default)]
pub struct SessionOverrides {
    pub interval_secs: Option<u64>,
    pub history_path: Option<PathBuf>,
    pub no_history: bool,
}

impl SessionOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        SessionOptions {
            interval_secs: settings.session.interval_secs,
            tick: Duration::from_millis(settings.session.tick_millis),
            history_path: settings
                .history
                .enabled
                .then(|| settings.history.path.clone()),
            save_every: settings.history.save_every,
            analysis: AnalysisParams::from(&settings.analysis),
        }
    }

    /// Apply `run` flags. `--no-history` wins over `--history`.
    pub fn with_overrides(mut self, overrides: &SessionOverrides) -> Self {
        if let Some(secs) = overrides.interval_secs {
            self.interval_secs = secs;
        }
        if let Some(path) = &overrides.history_path {
            self.history_path = Some(path.clone());
        }
        if overrides.no_history {
            self.history_path = None;
        }
        self
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions::from_settings(&Settings::default())
    }
}

mod millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }
}
