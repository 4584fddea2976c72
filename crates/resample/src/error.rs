//! Error types for panel resampling.

/// Errors that can occur while aligning a panel onto a regular calendar.
#[derive(Debug, thiserror::Error)]
pub enum ResampleError {
    /// Fill strategy name not recognized.
    #[error("unknown fill strategy: '{0}' (expected zero-fill, na-fill, or interpolate-linear)")]
    UnknownStrategy(String),

    /// Missing required column.
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// Polars error.
    #[error("data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}
