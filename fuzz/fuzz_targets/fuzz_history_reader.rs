//! Fuzz target for history CSV parsing.
//!
//! The history file may be edited by hand; parsing must return an error,
//! never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tally_history::reader::parse_history;

fuzz_target!(|data: &str| {
    let _ = parse_history(data);
});
