//! Rolling-window Pearson correlation over paired series.

use ndarray::Array1;

use crate::MathError;

/// Rolling Pearson correlation between two aligned series.
///
/// Slides a window of `window` observations over the pair and emits the
/// sample correlation at each position once the window is full. Positions
/// before the first full window are NaN. A window that contains any
/// non-finite value in either series, or whose values are constant in
/// either series (zero variance), also yields NaN rather than an error.
///
/// Sums are maintained incrementally, so the whole sweep is O(n)
/// regardless of window length.
///
/// # Arguments
/// * `x` - Left series
/// * `y` - Right series, aligned index-for-index with `x`
/// * `window` - Number of observations per window
///
/// # Returns
/// Array of the same length as the inputs, NaN where the correlation is
/// undefined.
///
/// # Errors
/// Returns an error if `window < 2` or the series lengths differ.
pub fn rolling_pearson(
    x: &Array1<f64>,
    y: &Array1<f64>,
    window: usize,
) -> Result<Array1<f64>, MathError> {
    if window < 2 {
        return Err(MathError::InvalidWindow(window));
    }
    if x.len() != y.len() {
        return Err(MathError::LengthMismatch { left: x.len(), right: y.len() });
    }

    let n = x.len();
    let mut out = Array1::from_elem(n, f64::NAN);
    if n < window {
        return Ok(out);
    }

    // Trailing run lengths of equal finite values. A run covering the whole
    // window means the series is exactly constant there, which the variance
    // check alone can miss under floating-point cancellation.
    let mut run_x = vec![1usize; n];
    let mut run_y = vec![1usize; n];
    for i in 1..n {
        if x[i].is_finite() && x[i] == x[i - 1] {
            run_x[i] = run_x[i - 1] + 1;
        }
        if y[i].is_finite() && y[i] == y[i - 1] {
            run_y[i] = run_y[i - 1] + 1;
        }
    }

    let w = window as f64;
    let mut sx = 0.0;
    let mut sy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    let mut missing = 0usize;

    for i in 0..n {
        let (xi, yi) = (x[i], y[i]);
        if xi.is_finite() && yi.is_finite() {
            sx += xi;
            sy += yi;
            sxx += xi * xi;
            syy += yi * yi;
            sxy += xi * yi;
        } else {
            missing += 1;
        }

        if i >= window {
            let (xo, yo) = (x[i - window], y[i - window]);
            if xo.is_finite() && yo.is_finite() {
                sx -= xo;
                sy -= yo;
                sxx -= xo * xo;
                syy -= yo * yo;
                sxy -= xo * yo;
            } else {
                missing -= 1;
            }
        }

        if i + 1 >= window && missing == 0 && run_x[i] < window && run_y[i] < window {
            let cov = sxy - sx * sy / w;
            let var_x = sxx - sx * sx / w;
            let var_y = syy - sy * sy / w;
            if var_x > 0.0 && var_y > 0.0 {
                out[i] = cov / (var_x * var_y).sqrt();
            }
        }
    }

    Ok(out)
}
