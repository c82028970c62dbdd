//! Fuzz target for the analysis engine.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tally_core::analysis::{analyze, render_report, AnalysisParams};

#[derive(Arbitrary, Debug)]
struct Input {
    series: Vec<u32>,
    window: u8,
    block_size: u8,
    max_lags: u8,
}

fuzz_target!(|input: Input| {
    let series: Vec<u64> = input.series.iter().map(|&v| u64::from(v)).collect();
    let params = AnalysisParams {
        moving_average_window: usize::from(input.window),
        block_size: usize::from(input.block_size).max(2),
        stationarity_threshold: 0.2,
        max_acf_lags: usize::from(input.max_lags).max(1),
    };
    let snapshot = analyze(&series, &params);
    if let Some(d) = snapshot.diagnostics() {
        assert_eq!(d.moving_average.len(), series.len());
    }
    let _ = render_report(&snapshot);
});
