//! Centered moving average.
//!
//! The smoother is a uniform kernel convolved with the series and cropped
//! to the input length ("same" mode). Values outside the series count as
//! zero, so the first and last few points are pulled toward zero instead of
//! being dropped.

/// Centered moving average with window `window`.
///
/// Output length always equals input length. When the series is shorter
/// than the window (or the window is zero) the input is returned unchanged.
///
/// For window `w` the value at index `i` averages the `w` positions ending
/// at `i + (w - 1) / 2`.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    if window == 0 || n < window {
        return values.to_vec();
    }

    let lead = (window - 1) / 2;
    let width = window as f64;
    (0..n)
        .map(|i| {
            let hi = i + lead;
            let lo = hi as isize - (window as isize - 1);
            let start = lo.max(0) as usize;
            let end = hi.min(n - 1);
            values[start..=end].iter().sum::<f64>() / width
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-12, "{:?} != {:?}", a, b);
        }
    }

    #[test]
    fn short_series_is_unchanged() {
        let values = [3.0, 1.0, 4.0];
        assert_eq!(moving_average(&values, 5), values.to_vec());
    }

    #[test]
    fn odd_window_attenuates_edges() {
        let out = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 5);
        assert_close(&out, &[1.2, 2.0, 3.0, 2.8, 2.4]);
    }

    #[test]
    fn constant_interior_is_preserved() {
        let values = vec![2.0; 12];
        let out = moving_average(&values, 5);
        for v in &out[2..10] {
            assert!((v - 2.0).abs() < 1e-12);
        }
        assert!((out[0] - 1.2).abs() < 1e-12);
        assert!((out[11] - 1.2).abs() < 1e-12);
    }

    #[test]
    fn even_window_leans_left() {
        // Window 4 averages i-2..=i+1.
        let out = moving_average(&[4.0, 4.0, 4.0, 4.0, 4.0], 4);
        assert_close(&out, &[2.0, 3.0, 4.0, 4.0, 3.0]);
    }

    #[test]
    fn zero_window_is_identity() {
        assert_eq!(moving_average(&[1.0, 2.0], 0), vec![1.0, 2.0]);
    }
}
