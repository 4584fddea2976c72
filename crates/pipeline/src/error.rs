//! Error types for pipeline orchestration.

use std::path::PathBuf;

use comove_resample::ResampleError;
use comove_rolling::RollingError;
use comove_store::StoreError;

/// Errors that can abort a pipeline run.
///
/// Every stage failure is fatal: the run stops at the first error with no
/// retries and no partial-failure recovery.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Resampling stage failed.
    #[error("resample stage: {0}")]
    Resample(#[from] ResampleError),

    /// Partitioned store failed.
    #[error("store stage: {0}")]
    Store(#[from] StoreError),

    /// Rolling correlation stage failed.
    #[error("correlation stage: {0}")]
    Rolling(#[from] RollingError),

    /// Missing required column in an input artifact.
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// Reference series has no date-typed column to label.
    #[error("reference series has no date axis to label")]
    MissingDateAxis,

    /// Filesystem error on a pipeline artifact.
    #[error("i/o error at {}: {source}", path.display())]
    Io {
        /// Path the operation failed on.
        path: PathBuf,
        /// Underlying i/o error.
        source: std::io::Error,
    },

    /// Polars error.
    #[error("data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}
