//! End-to-end pipeline orchestration.

use std::path::{Path, PathBuf};

use comove_primitives::schema;
use comove_resample::ResampleEngine;
use comove_rolling::CorrelationEngine;
use comove_store::PartitionedStore;
use polars::prelude::*;
use tracing::{debug, info};

use crate::{
    ENTITY_RETURNS_FILE, MARKET_RETURNS_FILE, PipelineConfig, PipelineError, RESULT_FILE,
    STORE_DIR, panel,
};

/// Row and partition counts from one completed run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Rows in the input panel as loaded.
    pub input_rows: usize,
    /// Distinct entities in the input panel.
    pub entities: usize,
    /// Rows in the resampled panel.
    pub resampled_rows: usize,
    /// Partitions replaced in the store.
    pub partitions_written: usize,
    /// Partitions read back and correlated.
    pub partitions_processed: usize,
    /// Rows in the final correlation output.
    pub result_rows: usize,
    /// Path of the final correlation output.
    pub result_path: PathBuf,
}

/// Run the full pipeline over one working directory.
///
/// Loads the entity panel and market series from `workdir`, resamples the
/// panel onto the configured grid, persists it to the partitioned store
/// under `workdir/store`, then walks partitions `0..partition_count` in
/// order, correlating each present partition against the market series.
/// The concatenated result lands as CSV next to the partitions.
///
/// Any stage failure aborts the whole run; there is no resume from a
/// partially processed store.
///
/// # Errors
/// Returns an error on invalid configuration (surfaced before any i/o)
/// or the first stage failure.
pub fn run_pipeline(
    workdir: &Path,
    config: &PipelineConfig,
) -> Result<PipelineReport, PipelineError> {
    let resampler = ResampleEngine::new(config.frequency, config.strategy);
    let store = PartitionedStore::new(workdir.join(STORE_DIR), config.partition_count)?;
    let correlator = CorrelationEngine::new(config.window)?;

    let panel_path = workdir.join(ENTITY_RETURNS_FILE);
    info!("loading entity panel from {}", panel_path.display());
    let panel = panel::load_entity_panel(&panel_path)?;
    let input_rows = panel.height();
    let entities = panel.column(schema::ENTITY_ID)?.unique()?.len();
    info!(rows = input_rows, entities, "entity panel loaded");
    log_mem_usage("entity panel", &panel);

    info!(strategy = %config.strategy, "resampling entity panel");
    let resampled = resampler.resample(&panel)?;
    log_mem_usage("resampled panel", &resampled);
    drop(panel);

    let summary = store.write(&resampled)?;
    info!(rows = summary.rows, partitions = summary.partitions, "partitioned store written");
    let resampled_rows = resampled.height();
    drop(resampled);

    let reference = panel::load_reference(&workdir.join(MARKET_RETURNS_FILE))?;
    log_mem_usage("reference series", &reference);

    let mut partials: Vec<LazyFrame> = Vec::new();
    let mut processed = 0usize;
    for index in 0..config.partition_count {
        let Some(partition) = store.read_partition(index)? else {
            debug!(partition = index, "partition absent, skipping");
            continue;
        };
        debug!(
            partition = index,
            rows = partition.height(),
            window = config.window,
            "correlating partition"
        );
        partials.push(correlator.correlate(&partition, &reference)?.lazy());
        processed += 1;
    }

    let mut result = if partials.is_empty() {
        empty_result()?
    } else {
        concat(partials, UnionArgs::default())?.collect()?
    };
    log_mem_usage("correlation result", &result);

    let result_path = store.root().join(RESULT_FILE);
    panel::write_result(&result_path, &mut result)?;
    info!(rows = result.height(), "result written to {}", result_path.display());

    Ok(PipelineReport {
        input_rows,
        entities,
        resampled_rows,
        partitions_written: summary.partitions,
        partitions_processed: processed,
        result_rows: result.height(),
        result_path,
    })
}

fn log_mem_usage(data_name: &str, df: &DataFrame) {
    debug!("{data_name} mem usage: {:.2} MB", df.estimated_size() as f64 / 1e6);
}

fn empty_result() -> Result<DataFrame, PipelineError> {
    DataFrame::new(vec![
        Column::new(schema::ENTITY_ID.into(), Vec::<i64>::new()),
        Column::new(schema::DATE.into(), Vec::<i32>::new()).cast(&DataType::Date)?,
        Column::new(schema::CORRELATION.into(), Vec::<Option<f64>>::new()),
    ])
    .map_err(PipelineError::from)
}
