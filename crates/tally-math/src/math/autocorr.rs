//! Sample autocorrelation function.
//!
//! Uses the standard (biased) estimator: the lag-k autocovariance is
//! `sum_{t < n-k} (x_t - m)(x_{t+k} - m) / n` and the autocorrelation is its
//! ratio to the lag-0 autocovariance. No FFT path; series here are short.

use thiserror::Error;

/// Reasons the autocorrelation function cannot be evaluated.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcfError {
    #[error("need at least 2 observations, got {0}")]
    TooShort(usize),

    #[error("series has zero variance")]
    ZeroVariance,

    #[error("autocorrelation is not finite")]
    NonFinite,
}

/// Autocorrelation coefficients for lags `0..=nlags`.
///
/// `nlags` is clamped to `n - 1`. The returned vector always starts with
/// 1.0 at lag 0.
pub fn acf(values: &[f64], nlags: usize) -> Result<Vec<f64>, AcfError> {
    let n = values.len();
    if n < 2 {
        return Err(AcfError::TooShort(n));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(AcfError::NonFinite);
    }

    let nlags = nlags.min(n - 1);
    let m = values.iter().sum::<f64>() / n as f64;
    let centered: Vec<f64> = values.iter().map(|x| x - m).collect();

    let c0: f64 = centered.iter().map(|d| d * d).sum::<f64>() / n as f64;
    if c0 == 0.0 {
        return Err(AcfError::ZeroVariance);
    }

    let mut out = Vec::with_capacity(nlags + 1);
    out.push(1.0);
    for k in 1..=nlags {
        let ck: f64 = centered
            .iter()
            .zip(&centered[k..])
            .map(|(a, b)| a * b)
            .sum::<f64>()
            / n as f64;
        let r = ck / c0;
        if !r.is_finite() {
            return Err(AcfError::NonFinite);
        }
        out.push(r);
    }
    Ok(out)
}

/// Lag-1 coefficient taken from an ACF evaluated over
/// `min(max_lags, max(1, n - 1))` lags.
pub fn lag1_autocorrelation(values: &[f64], max_lags: usize) -> Result<f64, AcfError> {
    let nlags = max_lags.min(values.len().saturating_sub(1).max(1));
    let coeffs = acf(values, nlags)?;
    coeffs.get(1).copied().ok_or(AcfError::TooShort(values.len()))
}
