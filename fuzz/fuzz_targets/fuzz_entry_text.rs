//! Fuzz target for operator entry parsing.
//!
//! Any text either becomes exactly one new observation or is rejected
//! with the log left untouched.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tally_core::observation::ObservationLog;

fuzz_target!(|data: &str| {
    let mut log = ObservationLog::new();
    log.append_count(1);
    match log.append(data) {
        Ok(len) => assert_eq!(len, 2),
        Err(_) => assert_eq!(log.as_slice(), &[1]),
    }
});
