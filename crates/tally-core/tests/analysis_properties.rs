//! Property-based tests for the analysis engine and the observation log.

use proptest::prelude::*;
use tally_core::analysis::{analyze, AnalysisParams, AnalysisSnapshot, Dispersion};
use tally_core::observation::ObservationLog;

fn series_strategy(max_len: usize) -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..20, 1..max_len)
}

fn diagnostics(series: &[u64]) -> tally_core::analysis::Diagnostics {
    match analyze(series, &AnalysisParams::default()) {
        AnalysisSnapshot::Ready(d) => d,
        AnalysisSnapshot::NoData { .. } => panic!("non-empty series must be analyzable"),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn analyze_is_pure(series in series_strategy(60)) {
        let params = AnalysisParams::default();
        prop_assert_eq!(analyze(&series, &params), analyze(&series, &params));
    }

    #[test]
    fn moving_average_keeps_length(series in series_strategy(60), window in 0usize..12) {
        let params = AnalysisParams { moving_average_window: window, ..AnalysisParams::default() };
        let snapshot = analyze(&series, &params);
        let d = snapshot.diagnostics().unwrap();
        prop_assert_eq!(d.moving_average.len(), series.len());
    }

    #[test]
    fn forecast_is_poisson(series in series_strategy(40)) {
        let d = diagnostics(&series);
        let expected = 1.0 - (-d.lambda).exp();
        prop_assert!((d.forecast.prob_at_least_one - expected).abs() < 1e-9);
        prop_assert!((0.0..=1.0).contains(&d.forecast.prob_at_least_one));
        prop_assert_eq!(d.forecast.expected_count, d.lambda);
    }

    #[test]
    fn stationarity_needs_two_blocks(series in series_strategy(60)) {
        let d = diagnostics(&series);
        let n = series.len();
        if n < 20 {
            prop_assert_eq!(d.stationarity.score, None);
        } else {
            match d.stationarity.score {
                Some(score) => prop_assert!(score.is_finite() && score >= 0.0),
                None => {
                    let covered = (n / 10) * 10;
                    prop_assert!(series[..covered].iter().all(|&v| v == 0));
                }
            }
        }
    }

    #[test]
    fn variance_and_dispersion_are_sane(series in series_strategy(40)) {
        let d = diagnostics(&series);
        prop_assert!(d.variance >= 0.0);
        if series.len() == 1 {
            prop_assert_eq!(d.variance, 0.0);
        }
        match d.dispersion {
            Dispersion::Unbounded => prop_assert_eq!(d.lambda, 0.0),
            Dispersion::Index(v) => prop_assert!(v >= 0.0 && v.is_finite()),
        }
    }

    #[test]
    fn autocorrelation_is_bounded_when_defined(series in series_strategy(40)) {
        let d = diagnostics(&series);
        if let Some(r) = d.autocorrelation {
            prop_assert!(r.abs() <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn rejected_text_leaves_log_unchanged(
        series in prop::collection::vec(0u64..100, 0..10),
        bad in prop_oneof![
            Just("-1".to_string()),
            Just("abc".to_string()),
            Just(String::new()),
            "[a-z]{1,6}",
            (1i64..1000).prop_map(|v| format!("-{}", v)),
        ],
    ) {
        let mut log: ObservationLog = series.iter().copied().collect();
        prop_assert!(log.append(&bad).is_err());
        prop_assert_eq!(log.as_slice(), series.as_slice());
    }
}

#[test]
fn single_observation_dispersion() {
    let d = diagnostics(&[5]);
    assert_eq!(d.variance, 0.0);
    assert_eq!(d.dispersion, Dispersion::Index(0.0));

    let d = diagnostics(&[0]);
    assert_eq!(d.dispersion, Dispersion::Unbounded);
}

#[test]
fn unit_rate_probability() {
    let d = diagnostics(&[1]);
    assert!((d.forecast.prob_at_least_one - 0.6321).abs() < 1e-4);
}
