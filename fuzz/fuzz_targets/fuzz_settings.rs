//! Fuzz target for settings.json parsing and validation.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tally_config::{validate_settings, Settings};

fuzz_target!(|data: &str| {
    if let Ok(settings) = Settings::from_json(data) {
        let _ = validate_settings(&settings);
    }
});
