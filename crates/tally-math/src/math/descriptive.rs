//! Descriptive statistics over a count series.
//!
//! All functions take `&[f64]` and never panic on empty input; the
//! degenerate cases return a documented value instead.

/// Arithmetic mean. Returns NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance with Bessel's correction (ddof = 1).
///
/// Returns 0.0 when fewer than two values are present.
pub fn sample_variance(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    ss / (n - 1) as f64
}

/// Population standard deviation (ddof = 0). Returns 0.0 for an empty slice.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    (ss / values.len() as f64).sqrt()
}

/// Variance-to-mean ratio.
///
/// `None` when the mean is exactly zero; the ratio is then unbounded and
/// callers are expected to flag it rather than divide.
pub fn dispersion_index(variance: f64, mean: f64) -> Option<f64> {
    if mean == 0.0 {
        None
    } else {
        Some(variance / mean)
    }
}

/// Means of disjoint consecutive blocks of `block_size` values.
///
/// A trailing partial block is discarded. A zero block size yields no
/// blocks.
pub fn block_means(values: &[f64], block_size: usize) -> Vec<f64> {
    if block_size == 0 {
        return Vec::new();
    }
    values
        .chunks_exact(block_size)
        .map(mean)
        .collect()
}
