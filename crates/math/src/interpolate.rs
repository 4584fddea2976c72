//! Positional linear interpolation over gap-filled series.

use ndarray::Array1;

/// Fill interior gaps of a series by linear interpolation.
///
/// Any run of non-finite values bracketed by finite neighbors is replaced
/// with evenly spaced values between those neighbors, by position. Runs at
/// the head or tail of the series have no bracket and are left as-is, and
/// non-finite values (NaN or infinite) are all treated as missing.
///
/// # Arguments
/// * `values` - Series to fill, gaps marked by NaN
///
/// # Returns
/// A new array with interior gaps filled.
#[must_use]
pub fn interpolate_linear(values: &Array1<f64>) -> Array1<f64> {
    let mut out = values.clone();
    let n = out.len();

    let mut i = 0;
    while i < n {
        if out[i].is_finite() {
            i += 1;
            continue;
        }

        let start = i;
        let mut j = i;
        while j < n && !out[j].is_finite() {
            j += 1;
        }

        if start > 0 && j < n {
            let lo = out[start - 1];
            let hi = out[j];
            let step = (hi - lo) / (j - start + 1) as f64;
            for (offset, k) in (start..j).enumerate() {
                out[k] = lo + step * (offset + 1) as f64;
            }
        }

        i = j;
    }

    out
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::{Array1, array};

    use super::*;

    #[test]
    fn fills_single_gap() {
        let filled = interpolate_linear(&array![1.0, f64::NAN, 3.0]);
        assert_relative_eq!(filled[0], 1.0);
        assert_relative_eq!(filled[1], 2.0);
        assert_relative_eq!(filled[2], 3.0);
    }

    #[test]
    fn fills_multi_step_gap() {
        let filled = interpolate_linear(&array![0.0, f64::NAN, f64::NAN, f64::NAN, 4.0]);
        let expected = [0.0, 1.0, 2.0, 3.0, 4.0];
        for (got, want) in filled.iter().zip(expected) {
            assert_relative_eq!(*got, want, epsilon = 1e-12);
        }
    }

    #[test]
    fn weekly_observations_interpolate_between() {
        // 0.05 down to -0.03 over five business-day steps.
        let series =
            array![0.05, f64::NAN, f64::NAN, f64::NAN, f64::NAN, -0.03];
        let filled = interpolate_linear(&series);
        let expected = [0.05, 0.034, 0.018, 0.002, -0.014, -0.03];
        for (got, want) in filled.iter().zip(expected) {
            assert_relative_eq!(*got, want, epsilon = 1e-12);
        }
    }

    #[test]
    fn leading_and_trailing_gaps_untouched() {
        let filled = interpolate_linear(&array![f64::NAN, 1.0, f64::NAN, 3.0, f64::NAN]);
        assert!(filled[0].is_nan());
        assert_relative_eq!(filled[2], 2.0);
        assert!(filled[4].is_nan());
    }

    #[test]
    fn all_missing_stays_missing() {
        let filled = interpolate_linear(&array![f64::NAN, f64::NAN, f64::NAN]);
        assert!(filled.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn gapless_series_unchanged() {
        let series = array![0.1, -0.2, 0.3];
        let filled = interpolate_linear(&series);
        assert_eq!(filled, series);
    }

    #[test]
    fn empty_series() {
        let empty: Array1<f64> = array![];
        assert!(interpolate_linear(&empty).is_empty());
    }
}
