//! Interval countdown that gates when an observation may be entered.
//!
//! The timer is driven by an external one-second tick; it never reads a clock
//! itself, which keeps every transition deterministic under test.

use serde::Serialize;

/// Default interval length in seconds.
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Countdown state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "seconds_remaining", rename_all = "snake_case")]
pub enum TimerState {
    /// Not counting; the display shows the full interval.
    Idle,
    /// Counting down; seconds left in the interval (always >= 1).
    Running(u64),
    /// Interval elapsed; waiting for the operator's count.
    AwaitingEntry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// A countdown was already in progress; nothing changed.
    AlreadyRunning,
    /// Started while an entry was pending; the pending entry is abandoned.
    Restarted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No countdown in progress.
    Ignored,
    /// Seconds remaining after this tick.
    Counting(u64),
    /// This tick ended the interval.
    IntervalComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// A countdown or pending entry was stopped.
    Stopped,
    /// Already idle; only the display was reset.
    Reset,
}

/// Countdown over a fixed number of one-second ticks.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    interval_secs: u64,
    state: TimerState,
}

impl IntervalTimer {
    /// Create an idle timer. A zero interval is treated as one second.
    pub fn new(interval_secs: u64) -> Self {
        IntervalTimer {
            interval_secs: interval_secs.max(1),
            state: TimerState::Idle,
        }
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Seconds shown on the countdown display.
    pub fn remaining(&self) -> u64 {
        match self.state {
            TimerState::Idle => self.interval_secs,
            TimerState::Running(secs) => secs,
            TimerState::AwaitingEntry => 0,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running(_))
    }

    pub fn is_awaiting_entry(&self) -> bool {
        self.state == TimerState::AwaitingEntry
    }

    pub fn start(&mut self) -> StartOutcome {
        match self.state {
            TimerState::Running(_) => StartOutcome::AlreadyRunning,
            TimerState::Idle => {
                self.state = TimerState::Running(self.interval_secs);
                StartOutcome::Started
            }
            TimerState::AwaitingEntry => {
                self.state = TimerState::Running(self.interval_secs);
                StartOutcome::Restarted
            }
        }
    }

    /// Advance by one second.
    pub fn tick(&mut self) -> TickOutcome {
        match self.state {
            TimerState::Running(secs) if secs <= 1 => {
                self.state = TimerState::AwaitingEntry;
                TickOutcome::IntervalComplete
            }
            TimerState::Running(secs) => {
                self.state = TimerState::Running(secs - 1);
                TickOutcome::Counting(secs - 1)
            }
            TimerState::Idle | TimerState::AwaitingEntry => TickOutcome::Ignored,
        }
    }

    pub fn cancel(&mut self) -> CancelOutcome {
        let outcome = match self.state {
            TimerState::Idle => CancelOutcome::Reset,
            _ => CancelOutcome::Stopped,
        };
        self.state = TimerState::Idle;
        outcome
    }

    /// Begin the next interval after an accepted entry.
    pub fn restart_after_entry(&mut self) {
        self.state = TimerState::Running(self.interval_secs);
    }
}

impl Default for IntervalTimer {
    fn default() -> Self {
        IntervalTimer::new(DEFAULT_INTERVAL_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_ticks(timer: &mut IntervalTimer, n: usize) -> Vec<TickOutcome> {
        (0..n).map(|_| timer.tick()).collect()
    }

    #[test]
    fn full_interval_takes_exactly_interval_ticks() {
        let mut timer = IntervalTimer::default();
        assert_eq!(timer.start(), StartOutcome::Started);
        assert_eq!(timer.remaining(), 60);

        let outcomes = run_ticks(&mut timer, 59);
        assert_eq!(outcomes.first(), Some(&TickOutcome::Counting(59)));
        assert_eq!(outcomes.last(), Some(&TickOutcome::Counting(1)));
        assert!(timer.is_running());

        assert_eq!(timer.tick(), TickOutcome::IntervalComplete);
        assert!(timer.is_awaiting_entry());
        assert_eq!(timer.remaining(), 0);
    }

    #[test]
    fn ticks_are_ignored_when_not_running() {
        let mut timer = IntervalTimer::new(2);
        assert_eq!(timer.tick(), TickOutcome::Ignored);
        assert_eq!(timer.state(), TimerState::Idle);

        timer.start();
        run_ticks(&mut timer, 2);
        assert!(timer.is_awaiting_entry());
        assert_eq!(timer.tick(), TickOutcome::Ignored);
        assert!(timer.is_awaiting_entry());
    }

    #[test]
    fn start_while_running_is_a_no_op() {
        let mut timer = IntervalTimer::new(10);
        timer.start();
        timer.tick();
        assert_eq!(timer.start(), StartOutcome::AlreadyRunning);
        assert_eq!(timer.remaining(), 9);
    }

    #[test]
    fn start_while_awaiting_restarts_countdown() {
        let mut timer = IntervalTimer::new(1);
        timer.start();
        timer.tick();
        assert_eq!(timer.start(), StartOutcome::Restarted);
        assert_eq!(timer.state(), TimerState::Running(1));
    }

    #[test]
    fn cancel_returns_to_idle_from_any_state() {
        let mut timer = IntervalTimer::new(3);
        assert_eq!(timer.cancel(), CancelOutcome::Reset);
        assert_eq!(timer.remaining(), 3);

        timer.start();
        timer.tick();
        assert_eq!(timer.cancel(), CancelOutcome::Stopped);
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.remaining(), 3);

        timer.start();
        run_ticks(&mut timer, 3);
        assert_eq!(timer.cancel(), CancelOutcome::Stopped);
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[test]
    fn restart_after_entry_starts_a_fresh_interval() {
        let mut timer = IntervalTimer::new(5);
        timer.start();
        run_ticks(&mut timer, 5);
        timer.restart_after_entry();
        assert_eq!(timer.state(), TimerState::Running(5));
    }

    #[test]
    fn zero_interval_is_clamped() {
        let mut timer = IntervalTimer::new(0);
        assert_eq!(timer.interval_secs(), 1);
        timer.start();
        assert_eq!(timer.tick(), TickOutcome::IntervalComplete);
    }

    #[test]
    fn state_serializes_with_remaining_seconds() {
        let json = serde_json::to_value(TimerState::Running(42)).unwrap();
        assert_eq!(json["state"], "running");
        assert_eq!(json["seconds_remaining"], 42);
        let json = serde_json::to_value(TimerState::Idle).unwrap();
        assert_eq!(json["state"], "idle");
    }
}
