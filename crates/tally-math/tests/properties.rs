//! Property-based tests for tally-math numerical functions.
//!
//! Uses proptest to verify the statistical primitives across many random
//! count series.

use proptest::prelude::*;
use tally_math::{
    acf, block_means, mean, moving_average, poisson_pmf, population_std_dev,
    prob_at_least_one, sample_variance,
};

/// Tolerance for floating point comparisons.
const TOL: f64 = 1e-9;

fn counts(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0u32..50, 0..max_len).prop_map(|v| v.into_iter().map(f64::from).collect())
}

// ============================================================================
// Descriptive statistics
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Sample variance is never negative.
    #[test]
    fn variance_non_negative(values in counts(60)) {
        prop_assert!(sample_variance(&values) >= 0.0);
    }

    /// Mean of a non-empty series lies between its min and max.
    #[test]
    fn mean_is_bounded(values in counts(60).prop_filter("non-empty", |v| !v.is_empty())) {
        let m = mean(&values);
        let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(m >= lo - TOL && m <= hi + TOL);
    }

    /// Block means cover exactly floor(n / size) blocks.
    #[test]
    fn block_count(values in counts(80), size in 1usize..15) {
        prop_assert_eq!(block_means(&values, size).len(), values.len() / size);
    }

    /// Population std dev of block means is non-negative and finite.
    #[test]
    fn block_spread_finite(values in counts(80)) {
        let s = population_std_dev(&block_means(&values, 10));
        prop_assert!(s.is_finite() && s >= 0.0);
    }
}

// ============================================================================
// Moving average
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Output length equals input length for any window.
    #[test]
    fn moving_average_same_length(values in counts(60), window in 0usize..20) {
        prop_assert_eq!(moving_average(&values, window).len(), values.len());
    }

    /// Zero padding never lifts a value above the series maximum.
    #[test]
    fn moving_average_bounded_by_max(values in counts(60), window in 1usize..10) {
        let hi = values.iter().cloned().fold(0.0, f64::max);
        for v in moving_average(&values, window) {
            prop_assert!(v <= hi + TOL && v >= 0.0);
        }
    }
}

// ============================================================================
// Autocorrelation
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Every coefficient of a defined ACF lies in [-1, 1].
    #[test]
    fn acf_bounded(values in counts(60), nlags in 1usize..12) {
        if let Ok(coeffs) = acf(&values, nlags) {
            prop_assert!((coeffs[0] - 1.0).abs() < TOL);
            for r in coeffs {
                prop_assert!(r.abs() <= 1.0 + TOL, "coefficient {} out of range", r);
            }
        }
    }

    /// The ACF is invariant to shifting the series by a constant.
    #[test]
    fn acf_shift_invariant(values in counts(40), shift in 0u32..100) {
        let shifted: Vec<f64> = values.iter().map(|v| v + f64::from(shift)).collect();
        match (acf(&values, 5), acf(&shifted, 5)) {
            (Ok(a), Ok(b)) => {
                for (x, y) in a.iter().zip(&b) {
                    prop_assert!((x - y).abs() < 1e-6);
                }
            }
            (Err(_), Err(_)) => {}
            (a, b) => prop_assert!(false, "mismatch: {:?} vs {:?}", a, b),
        }
    }
}

// ============================================================================
// Poisson forecast
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// P(at least one) = 1 - e^{-λ}.
    #[test]
    fn at_least_one_closed_form(lambda in 0.0..30.0f64) {
        let p = prob_at_least_one(lambda);
        prop_assert!((p - (1.0 - (-lambda).exp())).abs() < TOL);
        prop_assert!((0.0..=1.0).contains(&p));
    }

    /// The pmf is a probability.
    #[test]
    fn pmf_in_unit_interval(lambda in 0.0..20.0f64, k in 0u64..60) {
        let p = poisson_pmf(k, lambda);
        prop_assert!((0.0..=1.0 + TOL).contains(&p));
    }
}
