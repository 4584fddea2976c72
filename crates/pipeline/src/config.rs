//! Pipeline configuration and artifact layout.

use comove_resample::{FillStrategy, Frequency};

/// Entity return panel artifact, relative to the working directory.
pub const ENTITY_RETURNS_FILE: &str = "entity_returns.parquet";

/// Market return series artifact, relative to the working directory.
pub const MARKET_RETURNS_FILE: &str = "market_returns.parquet";

/// Partitioned store directory, relative to the working directory.
pub const STORE_DIR: &str = "store";

/// Final correlation output, relative to the store directory.
pub const RESULT_FILE: &str = "result_corr.csv";

/// Default partition count for the store's `entity_id mod P` scheme.
pub const DEFAULT_PARTITION_COUNT: u32 = 64;

/// Default rolling window: two years of business days.
pub const DEFAULT_WINDOW: usize = 262 * 2;

/// Knobs for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Grid frequency the panel is resampled onto.
    pub frequency: Frequency,
    /// Fill strategy for unobserved grid dates.
    pub strategy: FillStrategy,
    /// Number of store partitions.
    pub partition_count: u32,
    /// Rolling correlation window, in observations.
    pub window: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            frequency: Frequency::BusinessDaily,
            strategy: FillStrategy::InterpolateLinear,
            partition_count: DEFAULT_PARTITION_COUNT,
            window: DEFAULT_WINDOW,
        }
    }
}
