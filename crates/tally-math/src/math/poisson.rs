//! Poisson count distribution.
//!
//! Used for the one-step-ahead forecast: with rate `λ` the next interval's
//! count is `Poisson(λ)`.

use super::stable::log_factorial;

/// Log of the Poisson probability mass `P(K = k; λ)`.
///
/// `λ = 0` is the point mass at zero. Negative or NaN rates give NaN.
pub fn poisson_log_pmf(k: u64, lambda: f64) -> f64 {
    if lambda.is_nan() || lambda < 0.0 {
        return f64::NAN;
    }
    if lambda == 0.0 {
        return if k == 0 { 0.0 } else { f64::NEG_INFINITY };
    }
    if lambda.is_infinite() {
        return f64::NEG_INFINITY;
    }
    k as f64 * lambda.ln() - lambda - log_factorial(k)
}

/// Poisson probability mass `P(K = k; λ)`.
pub fn poisson_pmf(k: u64, lambda: f64) -> f64 {
    let lp = poisson_log_pmf(k, lambda);
    if lp.is_nan() {
        return f64::NAN;
    }
    lp.exp()
}

/// Probability of at least one event: `1 - P(K = 0; λ) = 1 - e^{-λ}`.
pub fn prob_at_least_one(lambda: f64) -> f64 {
    if lambda.is_nan() || lambda < 0.0 {
        return f64::NAN;
    }
    1.0 - poisson_pmf(0, lambda)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pmf_known_values() {
        // P(2; 3) = 9/2 * e^-3
        let p = poisson_pmf(2, 3.0);
        assert!((p - 4.5 * (-3.0f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn zero_rate_is_point_mass() {
        assert_eq!(poisson_pmf(0, 0.0), 1.0);
        assert_eq!(poisson_pmf(3, 0.0), 0.0);
        assert_eq!(prob_at_least_one(0.0), 0.0);
    }

    #[test]
    fn at_least_one_unit_rate() {
        let p = prob_at_least_one(1.0);
        assert!((p - 0.632_120_558_8).abs() < 1e-9);
    }

    #[test]
    fn invalid_rate_is_nan() {
        assert!(poisson_pmf(1, -1.0).is_nan());
        assert!(prob_at_least_one(f64::NAN).is_nan());
    }
}
