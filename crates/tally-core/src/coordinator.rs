//! Coordinator: the one owner of the timer, the observation log and the
//! latest snapshot.
//!
//! Every event (start, tick, submission, cancel) goes through a `&mut self`
//! method, so all mutation is serialized by construction.
//!
//! ```text
//! Idle --start--> Running --tick(last)--> AwaitingEntry
//!   ^                 ^                        |
//!   |                 +----valid submission----+
//!   +------cancel (from any state)-------------+
//! ```

use serde::Serialize;
use tally_history::HistorySink;
use thiserror::Error;

use crate::analysis::{analyze, AnalysisParams, AnalysisSnapshot};
use crate::chart::{chart_feed, ChartFeed};
use crate::log_event;
use crate::logging::{event_names, LogContext, Stage};
use crate::observation::{InvalidInput, ObservationLog};
use crate::recorder::{HistoryRecorder, RecordOutcome};
use crate::timer::{CancelOutcome, IntervalTimer, StartOutcome, TickOutcome, TimerState};

/// Status shown before the first start.
pub const IDLE_STATUS: &str = "Type 'start' to begin the first interval.";

/// Rejected submission. The coordinator is unchanged after either error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("entry is locked until the current interval ends")]
    EntryLocked,

    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
}

/// Accepted submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    /// Number of observations after this one was appended.
    pub count: usize,
    pub value: u64,
    pub snapshot: AnalysisSnapshot,
    pub record: RecordOutcome,
}

pub struct Coordinator<S: HistorySink> {
    timer: IntervalTimer,
    log: ObservationLog,
    params: AnalysisParams,
    recorder: HistoryRecorder<S>,
    latest: AnalysisSnapshot,
    entry_enabled: bool,
    status: String,
    ctx: LogContext,
}

impl<S: HistorySink> Coordinator<S> {
    pub fn new(interval_secs: u64, params: AnalysisParams, recorder: HistoryRecorder<S>) -> Self {
        Coordinator {
            timer: IntervalTimer::new(interval_secs),
            log: ObservationLog::new(),
            params,
            recorder,
            latest: AnalysisSnapshot::empty(),
            entry_enabled: false,
            status: IDLE_STATUS.to_string(),
            ctx: LogContext::default(),
        }
    }

    pub fn with_log_context(mut self, ctx: LogContext) -> Self {
        self.ctx = ctx;
        self
    }

    pub fn start(&mut self) -> StartOutcome {
        let outcome = self.timer.start();
        match outcome {
            StartOutcome::Started => {
                self.status = self.countdown_status();
            }
            StartOutcome::Restarted => {
                self.entry_enabled = false;
                self.status =
                    format!("Countdown restarted; the pending entry was dropped. {}", self.countdown_status());
            }
            StartOutcome::AlreadyRunning => return outcome,
        }
        log_event!(
            self.ctx,
            INFO,
            event_names::TIMER_STARTED,
            Stage::Timer,
            "countdown started",
            interval_secs = self.timer.interval_secs(),
            observations = self.log.len()
        );
        outcome
    }

    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.timer.tick();
        match outcome {
            TickOutcome::Ignored => {}
            TickOutcome::Counting(_) => {
                self.status = self.countdown_status();
            }
            TickOutcome::IntervalComplete => {
                self.entry_enabled = true;
                self.status = format!(
                    "Interval {} complete: enter the number of events observed.",
                    self.log.len() + 1
                );
                log_event!(
                    self.ctx,
                    INFO,
                    event_names::TIMER_INTERVAL_COMPLETE,
                    Stage::Timer,
                    "interval complete, awaiting entry",
                    interval = self.log.len() + 1
                );
            }
        }
        outcome
    }

    /// Submit the operator's count for the interval that just ended.
    pub fn submit(&mut self, text: &str) -> Result<Submission, SubmitError> {
        if !self.entry_enabled || !self.timer.is_awaiting_entry() {
            log_event!(
                self.ctx,
                DEBUG,
                event_names::ENTRY_REJECTED,
                Stage::Entry,
                "entry while locked",
                reason = "locked"
            );
            return Err(SubmitError::EntryLocked);
        }

        let count = match self.log.append(text) {
            Ok(count) => count,
            Err(e) => {
                self.status = format!("Rejected: {}", e);
                log_event!(
                    self.ctx,
                    INFO,
                    event_names::ENTRY_REJECTED,
                    Stage::Entry,
                    "invalid entry",
                    reason = "invalid_input"
                );
                return Err(e.into());
            }
        };
        let value = self.log.last().unwrap_or_default();
        log_event!(
            self.ctx,
            INFO,
            event_names::ENTRY_ACCEPTED,
            Stage::Entry,
            "observation stored",
            index = count,
            value = value
        );

        self.latest = analyze(self.log.as_slice(), &self.params);
        if let Some(d) = self.latest.diagnostics() {
            log_event!(
                self.ctx,
                DEBUG,
                event_names::ANALYZE_FINISHED,
                Stage::Analyze,
                "analysis updated",
                observations = d.observations,
                lambda = d.lambda,
                variance = d.variance
            );
        }

        let record = self
            .recorder
            .maybe_record(&self.latest, self.log.as_slice(), count);
        match &record {
            RecordOutcome::Written => log_event!(
                self.ctx,
                INFO,
                event_names::RECORD_WRITTEN,
                Stage::Record,
                "history row saved",
                observations = count
            ),
            RecordOutcome::Failed(reason) => log_event!(
                self.ctx,
                WARN,
                event_names::RECORD_FAILED,
                Stage::Record,
                "history row not saved",
                observations = count,
                reason = reason.as_str()
            ),
            RecordOutcome::Skipped => {}
        }

        self.entry_enabled = false;
        self.timer.restart_after_entry();

        // A failed save is only logged; collection carries on unannounced.
        let mut status = format!(
            "Recorded {} for interval {}. Next interval started.",
            value, count
        );
        if record == RecordOutcome::Written {
            status.push_str(" History saved.");
        }
        self.status = status;

        Ok(Submission {
            count,
            value,
            snapshot: self.latest.clone(),
            record,
        })
    }

    /// Stop the countdown. Observations already entered are kept.
    pub fn cancel(&mut self) -> CancelOutcome {
        let outcome = self.timer.cancel();
        self.entry_enabled = false;
        self.status = format!(
            "Timer stopped with {} interval(s) recorded. Type 'start' to resume.",
            self.log.len()
        );
        if outcome == CancelOutcome::Stopped {
            log_event!(
                self.ctx,
                INFO,
                event_names::TIMER_CANCELLED,
                Stage::Timer,
                "countdown cancelled",
                observations = self.log.len()
            );
        }
        outcome
    }

    /// Operator-facing status line.
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn latest(&self) -> &AnalysisSnapshot {
        &self.latest
    }

    pub fn chart_feed(&self) -> ChartFeed {
        chart_feed(self.log.as_slice(), &self.latest)
    }

    pub fn observations(&self) -> &ObservationLog {
        &self.log
    }

    pub fn entry_enabled(&self) -> bool {
        self.entry_enabled
    }

    pub fn timer_state(&self) -> TimerState {
        self.timer.state()
    }

    pub fn remaining(&self) -> u64 {
        self.timer.remaining()
    }

    pub fn recorder(&self) -> &HistoryRecorder<S> {
        &self.recorder
    }

    pub fn log_context(&self) -> &LogContext {
        &self.ctx
    }

    fn countdown_status(&self) -> String {
        format!(
            "Interval {} running: {} s remaining.",
            self.log.len() + 1,
            self.timer.remaining()
        )
    }
}
