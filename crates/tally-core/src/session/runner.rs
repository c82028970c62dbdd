use std::io::{self, Write};
use std::sync::mpsc::Receiver;

use serde::Serialize;
use tally_history::HistorySink;

use super::{Command, SessionInput};
use crate::analysis::render_report;
use crate::coordinator::{Coordinator, SubmitError};
use crate::log_event;
use crate::logging::{event_names, Stage};
use crate::recorder::RecordOutcome;
use crate::timer::{CancelOutcome, StartOutcome, TickOutcome};

/// Countdown is echoed at multiples of this many seconds.
const REMINDER_EVERY: u64 = 10;
/// ...and on every one of the final seconds.
const FINAL_SECONDS: u64 = 5;

pub const HELP_TEXT: &str = "\
Commands:
  start    begin (or restart) the interval countdown
  cancel   stop the countdown; recorded intervals are kept
  report   show the latest analysis
  status   show the timer and entry state
  help     show this list
  quit     end the session
When an interval ends, type the number of events you observed (0, 1, 2, ...).";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEnd {
    Quit,
    InputClosed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub observations: usize,
    pub series: Vec<u64>,
    pub records_written: usize,
    pub record_failures: usize,
    pub ended_by: SessionEnd,
}

/// Drive `coordinator` from `inputs` until quit or end of input.
///
/// Everything the operator sees goes to `out`; only write failures on `out`
/// end the loop early.
pub fn run_session<S, W>(
    coordinator: &mut Coordinator<S>,
    inputs: &Receiver<SessionInput>,
    out: &mut W,
) -> io::Result<SessionSummary>
where
    S: HistorySink,
    W: Write,
{
    let mut written = 0usize;
    let mut failures = 0usize;
    let mut ended_by = SessionEnd::InputClosed;

    log_event!(
        coordinator.log_context(),
        INFO,
        event_names::SESSION_STARTED,
        Stage::Session,
        "session started",
        interval_secs = coordinator.remaining()
    );
    writeln!(out, "{}", coordinator.status())?;
    out.flush()?;

    for input in inputs.iter() {
        match input {
            SessionInput::Tick => match coordinator.tick() {
                TickOutcome::Counting(secs)
                    if secs % REMINDER_EVERY == 0 || secs <= FINAL_SECONDS =>
                {
                    writeln!(out, "{}", coordinator.status())?;
                }
                TickOutcome::IntervalComplete => {
                    writeln!(out, "{}", coordinator.status())?;
                }
                _ => {}
            },
            SessionInput::Line(line) => match Command::parse(&line) {
                Command::Start => {
                    if coordinator.start() == StartOutcome::AlreadyRunning {
                        writeln!(out, "Already running: {} s remaining.", coordinator.remaining())?;
                    } else {
                        writeln!(out, "{}", coordinator.status())?;
                    }
                }
                Command::Cancel => {
                    if coordinator.cancel() == CancelOutcome::Reset {
                        writeln!(out, "Timer is not running.")?;
                    }
                    writeln!(out, "{}", coordinator.status())?;
                }
                Command::Report => {
                    writeln!(out, "{}", render_report(coordinator.latest()).trim_end())?;
                }
                Command::Status => {
                    writeln!(
                        out,
                        "{} (intervals recorded: {}, entry {})",
                        coordinator.status(),
                        coordinator.observations().len(),
                        if coordinator.entry_enabled() { "open" } else { "locked" }
                    )?;
                }
                Command::Help => {
                    writeln!(out, "{}", HELP_TEXT)?;
                }
                Command::Quit => {
                    ended_by = SessionEnd::Quit;
                    break;
                }
                Command::Entry(text) => match coordinator.submit(&text) {
                    Ok(submission) => {
                        match submission.record {
                            RecordOutcome::Written => written += 1,
                            RecordOutcome::Failed(_) => failures += 1,
                            RecordOutcome::Skipped => {}
                        }
                        writeln!(out, "{}", render_report(&submission.snapshot).trim_end())?;
                        writeln!(out, "{}", coordinator.status())?;
                    }
                    Err(SubmitError::EntryLocked) => {
                        writeln!(
                            out,
                            "Entry is locked until the current interval ends. Type 'help' for commands."
                        )?;
                    }
                    Err(SubmitError::InvalidInput(_)) => {
                        writeln!(out, "{}", coordinator.status())?;
                    }
                },
            },
            SessionInput::Closed => break,
        }
        out.flush()?;
    }

    log_event!(
        coordinator.log_context(),
        INFO,
        event_names::SESSION_FINISHED,
        Stage::Session,
        "session finished",
        observations = coordinator.observations().len(),
        records_written = written
    );

    Ok(SessionSummary {
        observations: coordinator.observations().len(),
        series: coordinator.observations().as_slice().to_vec(),
        records_written: written,
        record_failures: failures,
        ended_by,
    })
}
