//! Periodic persistence of analysis snapshots.

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tally_history::{HistoryRecord, HistorySink};
use tracing::warn;

use crate::analysis::AnalysisSnapshot;

/// Default number of observations between saves.
pub const DEFAULT_SAVE_EVERY: u32 = 10;

/// What happened on a save opportunity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum RecordOutcome {
    /// Not a save point, history disabled, or nothing to save.
    Skipped,
    Written,
    /// The sink failed; the session continues.
    Failed(String),
}

/// Saves a history row every `save_every` observations.
#[derive(Debug)]
pub struct HistoryRecorder<S: HistorySink> {
    sink: Option<S>,
    save_every: u32,
}

impl<S: HistorySink> HistoryRecorder<S> {
    pub fn new(sink: S, save_every: u32) -> Self {
        HistoryRecorder {
            sink: Some(sink),
            save_every: save_every.max(1),
        }
    }

    /// A recorder that never writes.
    pub fn disabled() -> Self {
        HistoryRecorder {
            sink: None,
            save_every: DEFAULT_SAVE_EVERY,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn save_every(&self) -> u32 {
        self.save_every
    }

    pub fn sink(&self) -> Option<&S> {
        self.sink.as_ref()
    }

    /// True when `count` observations is a save point.
    pub fn is_save_point(&self, count: usize) -> bool {
        count > 0 && count % self.save_every as usize == 0
    }

    /// Save a row stamped with the local clock if `count` is a save point.
    pub fn maybe_record(
        &mut self,
        snapshot: &AnalysisSnapshot,
        series: &[u64],
        count: usize,
    ) -> RecordOutcome {
        self.maybe_record_at(snapshot, series, count, Local::now().naive_local())
    }

    /// As [`maybe_record`](Self::maybe_record) with an explicit timestamp.
    pub fn maybe_record_at(
        &mut self,
        snapshot: &AnalysisSnapshot,
        series: &[u64],
        count: usize,
        now: NaiveDateTime,
    ) -> RecordOutcome {
        if !self.is_save_point(count) {
            return RecordOutcome::Skipped;
        }
        let Some(sink) = self.sink.as_mut() else {
            return RecordOutcome::Skipped;
        };
        let Some(d) = snapshot.diagnostics() else {
            return RecordOutcome::Skipped;
        };

        let record = HistoryRecord {
            recorded_at: now,
            observation_count: count,
            lambda: d.lambda,
            variance: d.variance,
            autocorrelation: d.autocorrelation,
            stationarity: d.stationarity.verdict.history_flag(),
            series: series.to_vec(),
        };

        match sink.append(&record) {
            Ok(()) => RecordOutcome::Written,
            Err(e) => {
                warn!(sink = %sink.describe(), error = %e, "history save failed");
                RecordOutcome::Failed(e.to_string())
            }
        }
    }
}
