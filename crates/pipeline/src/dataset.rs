//! Synthetic dataset generation.
//!
//! Produces the two input artifacts the pipeline consumes: an irregular
//! entity return panel (each entity observed on a random subset of the
//! business-day grid) and a dense market return series over the same
//! grid. All randomness flows through a caller-supplied [`Rng`] so runs
//! are reproducible from a seed alone.

use std::path::{Path, PathBuf};

use chrono::Local;
use comove_primitives::{Date, EntityId, EntityReturn, ReferenceReturn};
use comove_resample::Frequency;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use tracing::info;

use crate::{ENTITY_RETURNS_FILE, MARKET_RETURNS_FILE, PipelineError, panel};

/// Seed used when the caller does not supply one.
pub const DEFAULT_RANDOM_SEED: u64 = 42;

/// Standard deviation of generated entity returns.
const ENTITY_RETURN_STD: f64 = 0.012;

/// Standard deviation of generated market returns.
const REFERENCE_RETURN_STD: f64 = 0.008;

const HISTORY_START: Date = Date::from_ymd_opt(2000, 1, 1).unwrap();

/// Shape of a generated dataset.
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    /// First calendar date of the history.
    pub history_start: Date,
    /// Last calendar date of the history.
    pub history_end: Date,
    /// Number of entities in the panel.
    pub entities: usize,
    /// Observed dates per entity, sampled without replacement from the
    /// business-day grid (capped at the grid length).
    pub dates_per_entity: usize,
}

impl Default for DatasetConfig {
    /// A quarter century of history through today, 5000 entities with
    /// 4000 observed dates each.
    fn default() -> Self {
        Self {
            history_start: HISTORY_START,
            history_end: Local::now().date_naive(),
            entities: 5000,
            dates_per_entity: 4000,
        }
    }
}

/// Draw each entity's observations on a random subset of `grid`.
///
/// Dates are sampled without replacement per entity, so `(entity_id,
/// date)` keys are unique; values are centered normal returns.
pub fn entity_returns(
    grid: &[Date],
    entities: usize,
    dates_per_entity: usize,
    rng: &mut impl Rng,
) -> Vec<EntityReturn> {
    let take = dates_per_entity.min(grid.len());
    let mut rows = Vec::with_capacity(entities * take);
    for entity in 0..entities {
        let id = EntityId::new(entity as i64);
        for slot in rand::seq::index::sample(rng, grid.len(), take) {
            let draw: f64 = rng.sample(StandardNormal);
            rows.push(EntityReturn::new(id, grid[slot], draw * ENTITY_RETURN_STD));
        }
    }
    rows
}

/// Draw one market return per grid date, in grid order.
pub fn reference_returns(grid: &[Date], rng: &mut impl Rng) -> Vec<ReferenceReturn> {
    grid.iter()
        .map(|date| {
            let draw: f64 = rng.sample(StandardNormal);
            ReferenceReturn::new(*date, draw * REFERENCE_RETURN_STD)
        })
        .collect()
}

/// Generate and persist both input artifacts under `dir`.
///
/// Returns the entity panel path and the market series path. The market
/// stream restarts from the same seed, so either artifact is reproducible
/// on its own.
///
/// # Errors
/// Returns an error if the directory cannot be created or either parquet
/// file cannot be written.
pub fn write_dataset(
    dir: &Path,
    config: &DatasetConfig,
    seed: u64,
) -> Result<(PathBuf, PathBuf), PipelineError> {
    let grid = Frequency::BusinessDaily.range(config.history_start, config.history_end);

    let mut rng = StdRng::seed_from_u64(seed);
    let entity_rows = entity_returns(&grid, config.entities, config.dates_per_entity, &mut rng);

    let mut rng = StdRng::seed_from_u64(seed);
    let reference_rows = reference_returns(&grid, &mut rng);

    std::fs::create_dir_all(dir)
        .map_err(|source| PipelineError::Io { path: dir.to_path_buf(), source })?;

    let entity_path = dir.join(ENTITY_RETURNS_FILE);
    panel::write_parquet(&entity_path, &mut panel::entity_frame(&entity_rows)?)?;
    let market_path = dir.join(MARKET_RETURNS_FILE);
    panel::write_parquet(&market_path, &mut panel::reference_frame(&reference_rows)?)?;

    info!(
        entities = config.entities,
        grid_days = grid.len(),
        seed,
        "dataset written to {}",
        dir.display()
    );
    Ok((entity_path, market_path))
}
