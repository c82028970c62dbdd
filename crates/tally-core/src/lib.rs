//! Tally Core Library
//!
//! This library provides the core functionality for interval event counting:
//! - The observation log and the interval countdown that gates entries
//! - The analysis engine (moving average, block stationarity, lag-1
//!   autocorrelation, Poisson forecast, interpretation)
//! - Periodic history recording
//! - The coordinator state machine and the interactive session loop
//! - Logging, exit codes and output formats for the CLI
//!
//! The binary entry point is in `main.rs`.

pub mod analysis;
pub mod chart;
pub mod config;
pub mod coordinator;
pub mod exit_codes;
pub mod logging;
pub mod observation;
pub mod output;
pub mod recorder;
pub mod session;
pub mod timer;
