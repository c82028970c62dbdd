//! Interactive collection session.
//!
//! Two feeder threads push events into one channel: a ticker that emits a
//! [`SessionInput::Tick`] per period and a line reader for operator input.
//! A single loop ([`run_session`]) owns the coordinator and consumes events
//! in arrival order.

mod runner;

pub use runner::{run_session, SessionEnd, SessionSummary, HELP_TEXT};

use std::io::BufRead;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::debug;

/// One event for the session loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionInput {
    Tick,
    Line(String),
    /// The line source reached end of input.
    Closed,
}

/// Operator command parsed from one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Cancel,
    Report,
    Status,
    Help,
    Quit,
    /// Anything else is a count submission.
    Entry(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "start" | "s" => Command::Start,
            "cancel" | "stop" | "c" => Command::Cancel,
            "report" | "r" => Command::Report,
            "status" => Command::Status,
            "help" | "h" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            _ => Command::Entry(trimmed.to_string()),
        }
    }
}

/// Send a tick every `period` until the receiver goes away.
pub fn spawn_ticker(tx: Sender<SessionInput>, period: Duration) -> JoinHandle<()> {
    thread::spawn(move || loop {
        thread::sleep(period);
        if tx.send(SessionInput::Tick).is_err() {
            debug!("session loop gone, ticker stopping");
            break;
        }
    })
}

/// Forward each line from `reader`, then [`SessionInput::Closed`] at EOF.
pub fn spawn_line_reader<R>(reader: R, tx: Sender<SessionInput>) -> JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        for line in reader.lines() {
            match line {
                Ok(line) => {
                    if tx.send(SessionInput::Line(line)).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    debug!(error = %e, "input read failed");
                    break;
                }
            }
        }
        let _ = tx.send(SessionInput::Closed);
    })
}
