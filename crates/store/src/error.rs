//! Error types for partitioned persistence.

use std::path::PathBuf;

/// Errors that can occur while writing or reading the partitioned store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Partition count must be at least one.
    #[error("invalid partition count: {0} (must be at least 1)")]
    InvalidPartitionCount(u32),

    /// Partition index outside the configured modulo space.
    #[error("partition index {index} out of range for {count} partitions")]
    InvalidPartitionIndex {
        /// Requested partition index.
        index: u32,
        /// Configured partition count.
        count: u32,
    },

    /// Missing required column.
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// Row without a partition key.
    #[error("null entity_id at row {row}; every row must carry a partition key")]
    NullEntityId {
        /// Offset of the offending row.
        row: usize,
    },

    /// Filesystem error under the store root.
    #[error("storage i/o error at {}: {source}", path.display())]
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
