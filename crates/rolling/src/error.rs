//! Error types for rolling correlation.

use comove_math::MathError;

/// Errors that can occur while computing rolling correlations.
#[derive(Debug, thiserror::Error)]
pub enum RollingError {
    /// Window length too small for a correlation.
    #[error("invalid correlation window: {0} (must be at least 2 observations)")]
    InvalidWindow(usize),

    /// Missing required column.
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// Math error.
    #[error("math error: {0}")]
    Math(#[from] MathError),

    /// Polars error.
    #[error("data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}
