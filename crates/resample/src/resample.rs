//! Panel resampling onto a regular calendar.

use std::collections::BTreeMap;

use comove_math::interpolate_linear;
use comove_primitives::schema;
use ndarray::Array1;
use polars::prelude::*;

use crate::{FillStrategy, Frequency, ResampleError};

/// Aligns an irregular multi-entity return panel onto a regular calendar.
///
/// Observations are grouped by entity and bucketed onto the grid date at
/// or after their own date. Each entity's output spans its own first to
/// last observed date only, never the global panel range. Buckets holding
/// more than one observation are summed; grid dates with no observed
/// value are filled per the configured [`FillStrategy`].
#[derive(Debug, Clone)]
pub struct ResampleEngine {
    frequency: Frequency,
    strategy: FillStrategy,
}

impl ResampleEngine {
    /// Create an engine for the given grid frequency and fill strategy.
    #[must_use]
    pub const fn new(frequency: Frequency, strategy: FillStrategy) -> Self {
        Self { frequency, strategy }
    }

    /// Grid frequency this engine aligns onto.
    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Fill strategy applied to unobserved grid dates.
    #[must_use]
    pub const fn strategy(&self) -> FillStrategy {
        self.strategy
    }

    /// Resample a panel of `entity_id`, `date`, `returns` rows.
    ///
    /// The output is dense per entity over its own span, sorted by
    /// `(entity_id, date)`, and keeps the input's float width for the
    /// `returns` column (`Float32` in means `Float32` out). An empty
    /// panel resamples to an empty panel.
    ///
    /// # Errors
    /// Returns an error if a required column is absent or a column cannot
    /// be read under the panel schema.
    pub fn resample(&self, panel: &DataFrame) -> Result<DataFrame, ResampleError> {
        let entities = require_column(panel, schema::ENTITY_ID)?.cast(&DataType::Int64)?;
        let dates = require_column(panel, schema::DATE)?.cast(&DataType::Date)?;
        let raw_returns = require_column(panel, schema::RETURNS)?;
        let narrow = matches!(raw_returns.dtype(), DataType::Float32);
        let values = raw_returns.cast(&DataType::Float64)?;

        let entities = entities.i64()?;
        let dates = dates.date()?.physical();
        let values = values.f64()?;

        // (sum, observed count) per grid date, per entity. A row with a
        // null value still claims its grid date for the entity's span.
        let mut buckets: BTreeMap<i64, BTreeMap<i32, (f64, usize)>> = BTreeMap::new();
        for ((entity, day), value) in entities.into_iter().zip(dates).zip(values) {
            let (Some(entity), Some(day)) = (entity, day) else {
                continue;
            };
            let grid_day = schema::date_to_days(
                self.frequency.roll_forward(schema::days_to_date(day)),
            );
            let slot = buckets.entry(entity).or_default().entry(grid_day).or_insert((0.0, 0));
            if let Some(value) = value {
                slot.0 += value;
                slot.1 += 1;
            }
        }

        let mut ids: Vec<i64> = Vec::new();
        let mut days: Vec<i32> = Vec::new();
        let mut vals: Vec<Option<f64>> = Vec::new();

        for (&entity, observed) in &buckets {
            let (Some(&first), Some(&last)) =
                (observed.keys().next(), observed.keys().next_back())
            else {
                continue;
            };
            let grid =
                self.frequency.range(schema::days_to_date(first), schema::days_to_date(last));

            let mut series: Vec<Option<f64>> = grid
                .iter()
                .map(|d| match observed.get(&schema::date_to_days(*d)) {
                    Some(&(sum, count)) if count > 0 => Some(sum),
                    _ => None,
                })
                .collect();
            self.fill(&mut series);

            ids.extend(std::iter::repeat_n(entity, grid.len()));
            days.extend(grid.iter().map(|d| schema::date_to_days(*d)));
            vals.append(&mut series);
        }

        let id_col = Column::new(schema::ENTITY_ID.into(), ids);
        let date_col = Column::new(schema::DATE.into(), days).cast(&DataType::Date)?;
        let mut returns_col = Column::new(schema::RETURNS.into(), vals);
        if narrow {
            returns_col = returns_col.cast(&DataType::Float32)?;
        }

        DataFrame::new(vec![id_col, date_col, returns_col]).map_err(ResampleError::from)
    }

    fn fill(&self, series: &mut Vec<Option<f64>>) {
        match self.strategy {
            FillStrategy::ZeroFill => {
                for v in series.iter_mut() {
                    if v.is_none() {
                        *v = Some(0.0);
                    }
                }
            }
            FillStrategy::NaFill => {}
            FillStrategy::InterpolateLinear => {
                let dense: Array1<f64> =
                    series.iter().map(|v| v.unwrap_or(f64::NAN)).collect();
                let filled = interpolate_linear(&dense);
                *series =
                    filled.iter().map(|v| v.is_finite().then_some(*v)).collect();
            }
        }
    }
}

fn require_column<'a>(panel: &'a DataFrame, name: &str) -> Result<&'a Column, ResampleError> {
    panel.column(name).map_err(|_| ResampleError::MissingColumn(name.to_string()))
}
