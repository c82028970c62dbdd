//! Structured event vocabulary for logging.
//!
//! Every event carries the run correlation ID and the stage it belongs to.

use serde::{Deserialize, Serialize};

/// Stages of an interval collection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and settings resolution.
    Init,
    /// Interval countdown.
    Timer,
    /// Observation entry and validation.
    Entry,
    /// Series analysis.
    Analyze,
    /// History persistence.
    Record,
    /// Interactive session loop.
    Session,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Timer => "timer",
            Stage::Entry => "entry",
            Stage::Analyze => "analyze",
            Stage::Record => "record",
            Stage::Session => "session",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    // Session lifecycle
    pub const SESSION_STARTED: &str = "session.started";
    pub const SESSION_FINISHED: &str = "session.finished";

    // Timer
    pub const TIMER_STARTED: &str = "timer.started";
    pub const TIMER_INTERVAL_COMPLETE: &str = "timer.interval_complete";
    pub const TIMER_CANCELLED: &str = "timer.cancelled";

    // Entry
    pub const ENTRY_ACCEPTED: &str = "entry.accepted";
    pub const ENTRY_REJECTED: &str = "entry.rejected";

    // Analysis
    pub const ANALYZE_FINISHED: &str = "analyze.finished";

    // History
    pub const RECORD_WRITTEN: &str = "record.written";
    pub const RECORD_FAILED: &str = "record.failed";

    // Config/init events
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_ERROR: &str = "config.error";
}

/// Correlation context shared by every event of one invocation.
#[derive(Debug, Clone)]
pub struct LogContext {
    /// Unique ID for this invocation.
    pub run_id: String,
    /// Label of the interactive session, when one is running.
    pub session_id: Option<String>,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
            session_id: None,
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

impl Default for LogContext {
    fn default() -> Self {
        LogContext::new(super::generate_run_id())
    }
}
