//! Scripted sessions: events are queued on the channel up front, so the loop
//! runs deterministically without the ticker thread.

use std::sync::mpsc;

use tally_core::analysis::AnalysisParams;
use tally_core::coordinator::Coordinator;
use tally_core::recorder::HistoryRecorder;
use tally_core::session::{run_session, SessionEnd, SessionInput};
use tally_history::MemorySink;

const INTERVAL: u64 = 3;

fn line(text: &str) -> SessionInput {
    SessionInput::Line(text.to_string())
}

fn ticks(n: u64) -> impl Iterator<Item = SessionInput> {
    (0..n).map(|_| SessionInput::Tick)
}

fn run_script(script: Vec<SessionInput>) -> (String, Coordinator<MemorySink>, tally_core::session::SessionSummary) {
    let (tx, rx) = mpsc::channel();
    for input in script {
        tx.send(input).unwrap();
    }
    drop(tx);

    let mut coordinator = Coordinator::new(
        INTERVAL,
        AnalysisParams::default(),
        HistoryRecorder::new(MemorySink::default(), 2),
    );
    let mut out = Vec::new();
    let summary = run_session(&mut coordinator, &rx, &mut out).unwrap();
    (String::from_utf8(out).unwrap(), coordinator, summary)
}

#[test]
fn full_cycle_records_and_reports() {
    let mut script = vec![line("start")];
    script.extend(ticks(INTERVAL));
    script.push(line("2"));
    script.extend(ticks(INTERVAL));
    script.push(line("0"));
    script.push(line("quit"));

    let (output, coordinator, summary) = run_script(script);

    assert_eq!(coordinator.observations().as_slice(), &[2, 0]);
    assert_eq!(summary.observations, 2);
    assert_eq!(summary.series, vec![2, 0]);
    assert_eq!(summary.records_written, 1);
    assert_eq!(summary.ended_by, SessionEnd::Quit);

    assert!(output.contains("Interval 1 complete"));
    assert!(output.contains("Intervals recorded: 2"));
    assert!(output.contains("History saved."));
}

#[test]
fn entries_before_interval_end_are_locked() {
    let mut script = vec![line("start"), line("4")];
    script.extend(ticks(1));
    script.push(line("status"));

    let (output, coordinator, summary) = run_script(script);

    assert!(coordinator.observations().is_empty());
    assert!(output.contains("Entry is locked"));
    assert!(output.contains("entry locked"));
    assert_eq!(summary.ended_by, SessionEnd::InputClosed);
}

#[test]
fn invalid_entry_is_reported_and_retry_succeeds() {
    let mut script = vec![line("start")];
    script.extend(ticks(INTERVAL));
    script.push(line("-3"));
    script.push(line("lots"));
    script.push(line("1"));
    script.push(SessionInput::Closed);
    script.push(line("7"));

    let (output, coordinator, summary) = run_script(script);

    assert!(output.contains("Rejected: negative value -3"));
    assert!(output.contains("Rejected: invalid value \"lots\""));
    assert_eq!(coordinator.observations().as_slice(), &[1]);
    // Nothing after Closed is consumed
    assert_eq!(summary.observations, 1);
    assert_eq!(summary.ended_by, SessionEnd::InputClosed);
}

#[test]
fn cancel_report_and_help() {
    let mut script = vec![line("report"), line("cancel"), line("start")];
    script.extend(ticks(INTERVAL));
    script.push(line("cancel"));
    script.push(line("help"));

    let (output, coordinator, _) = run_script(script);

    assert!(output.contains("No data yet."));
    assert!(output.contains("Timer is not running."));
    assert!(output.contains("Timer stopped with 0 interval(s) recorded"));
    assert!(output.contains("Commands:"));
    assert!(!coordinator.entry_enabled());
}
