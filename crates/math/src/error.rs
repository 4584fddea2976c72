//! Error types for the numeric kernels.

/// Errors that can occur in windowed computations.
#[derive(Debug, thiserror::Error)]
pub enum MathError {
    /// Window length too small for the statistic.
    #[error("invalid window: {0} (must be at least 2 observations)")]
    InvalidWindow(usize),

    /// Paired series have different lengths.
    #[error("length mismatch: left series has {left} values, right has {right}")]
    LengthMismatch {
        /// Length of the left series.
        left: usize,
        /// Length of the right series.
        right: usize,
    },
}
