//! Rolling correlation of entity panels against a reference series.

use std::collections::{BTreeMap, HashMap};

use comove_math::rolling_pearson;
use comove_primitives::schema;
use ndarray::Array1;
use polars::prelude::*;

use crate::RollingError;

/// Computes per-entity rolling Pearson correlations against a shared
/// reference series.
///
/// Each entity's return series is aligned to the reference by exact date
/// match, the correlation is computed per entity over a trailing window
/// of observations, and the entity key is reattached afterwards. Working
/// entity-by-entity on a plain date-indexed series keeps the output keyed
/// exactly like the input: one correlation row per input `(entity_id,
/// date)` row, never more, never fewer.
#[derive(Debug, Clone)]
pub struct CorrelationEngine {
    window: usize,
}

impl CorrelationEngine {
    /// Create an engine with the given window length, in observations.
    ///
    /// # Errors
    /// Returns an error if `window < 2`, which can never produce a
    /// defined correlation.
    pub const fn new(window: usize) -> Result<Self, RollingError> {
        if window < 2 {
            return Err(RollingError::InvalidWindow(window));
        }
        Ok(Self { window })
    }

    /// Window length in observations.
    #[must_use]
    pub const fn window(&self) -> usize {
        self.window
    }

    /// Correlate every entity in `partition` against `reference`.
    ///
    /// `partition` must carry `entity_id`, `date`, and `returns` columns;
    /// `reference` must carry `date` and `returns`. The result has one
    /// `(entity_id, date, correlation)` row per input partition row,
    /// sorted by `(entity_id, date)`, with a null correlation wherever
    /// the window is undefined: positions before the first full window,
    /// windows covering a missing return or a date absent from the
    /// reference, and windows where either series has zero variance.
    ///
    /// # Errors
    /// Returns an error if a required column is absent or cannot be read.
    pub fn correlate(
        &self,
        partition: &DataFrame,
        reference: &DataFrame,
    ) -> Result<DataFrame, RollingError> {
        let reference = reference_by_date(reference)?;

        let entities =
            require_column(partition, schema::ENTITY_ID)?.cast(&DataType::Int64)?;
        let dates = require_column(partition, schema::DATE)?.cast(&DataType::Date)?;
        let values = require_column(partition, schema::RETURNS)?.cast(&DataType::Float64)?;

        let entities = entities.i64()?;
        let dates = dates.date()?.physical();
        let values = values.f64()?;

        let mut series: BTreeMap<i64, Vec<(i32, f64)>> = BTreeMap::new();
        for ((entity, day), value) in entities.into_iter().zip(dates).zip(values) {
            let (Some(entity), Some(day)) = (entity, day) else {
                continue;
            };
            series.entry(entity).or_default().push((day, value.unwrap_or(f64::NAN)));
        }

        let mut ids: Vec<i64> = Vec::new();
        let mut days: Vec<i32> = Vec::new();
        let mut corrs: Vec<Option<f64>> = Vec::new();

        for (&entity, rows) in &mut series {
            rows.sort_by_key(|(day, _)| *day);

            let xs: Array1<f64> = rows.iter().map(|(_, value)| *value).collect();
            let ys: Array1<f64> = rows
                .iter()
                .map(|(day, _)| reference.get(day).copied().unwrap_or(f64::NAN))
                .collect();

            let corr = rolling_pearson(&xs, &ys, self.window)?;

            ids.extend(std::iter::repeat_n(entity, rows.len()));
            days.extend(rows.iter().map(|(day, _)| *day));
            corrs.extend(corr.iter().map(|c| c.is_finite().then_some(*c)));
        }

        let id_col = Column::new(schema::ENTITY_ID.into(), ids);
        let date_col = Column::new(schema::DATE.into(), days).cast(&DataType::Date)?;
        let corr_col = Column::new(schema::CORRELATION.into(), corrs);

        DataFrame::new(vec![id_col, date_col, corr_col]).map_err(RollingError::from)
    }
}

/// Reference series as a date-keyed lookup, nulls kept as NaN so they
/// poison any window that covers them.
fn reference_by_date(reference: &DataFrame) -> Result<HashMap<i32, f64>, RollingError> {
    let dates = require_column(reference, schema::DATE)?.cast(&DataType::Date)?;
    let values = require_column(reference, schema::RETURNS)?.cast(&DataType::Float64)?;

    let mut by_date = HashMap::with_capacity(reference.height());
    for (day, value) in dates.date()?.physical().into_iter().zip(values.f64()?) {
        if let Some(day) = day {
            by_date.insert(day, value.unwrap_or(f64::NAN));
        }
    }
    Ok(by_date)
}

fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, RollingError> {
    df.column(name).map_err(|_| RollingError::MissingColumn(name.to_string()))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use chrono::Datelike;
    use comove_primitives::Date;

    use super::*;

    /// The 21 business days of January 2010.
    fn january_2010() -> Vec<i32> {
        let mut days = Vec::new();
        let mut date: Date = "2010-01-01".parse().unwrap();
        let end: Date = "2010-01-31".parse().unwrap();
        while date <= end {
            if date.weekday().number_from_monday() <= 5 {
                days.push(schema::date_to_days(date));
            }
            date = date.succ_opt().unwrap();
        }
        assert_eq!(days.len(), 21);
        days
    }

    fn frame(ids: Vec<i64>, days: Vec<i32>, values: Vec<Option<f64>>) -> DataFrame {
        DataFrame::new(vec![
            Column::new(schema::ENTITY_ID.into(), ids),
            Column::new(schema::DATE.into(), days).cast(&DataType::Date).unwrap(),
            Column::new(schema::RETURNS.into(), values),
        ])
        .unwrap()
    }

    fn reference_frame(days: Vec<i32>, values: Vec<f64>) -> DataFrame {
        DataFrame::new(vec![
            Column::new(schema::DATE.into(), days).cast(&DataType::Date).unwrap(),
            Column::new(schema::RETURNS.into(), values),
        ])
        .unwrap()
    }

    fn correlations_of(df: &DataFrame) -> Vec<Option<f64>> {
        df.column(schema::CORRELATION).unwrap().f64().unwrap().into_iter().collect()
    }

    #[test]
    fn lockstep_and_inverse_entities() {
        let days = january_2010();
        let reference: Vec<f64> = (0..21).map(|i| 0.001 * f64::from(i)).collect();

        // Entity 1 moves with the reference, entity 2 exactly inverse.
        let mut ids = vec![1i64; 21];
        ids.extend(vec![2i64; 21]);
        let mut panel_days = days.clone();
        panel_days.extend(days.clone());
        let mut values: Vec<Option<f64>> = reference.iter().map(|v| Some(*v)).collect();
        values.extend(reference.iter().map(|v| Some(-*v)));

        let partition = frame(ids, panel_days, values);
        let reference = reference_frame(days, reference);

        let out = CorrelationEngine::new(5).unwrap().correlate(&partition, &reference).unwrap();
        assert_eq!(out.height(), 42);

        let corrs = correlations_of(&out);
        for i in 0..4 {
            assert!(corrs[i].is_none(), "entity 1 offset {i} should be undefined");
            assert!(corrs[21 + i].is_none(), "entity 2 offset {i} should be undefined");
        }
        for i in 4..21 {
            assert_relative_eq!(corrs[i].unwrap(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(corrs[21 + i].unwrap(), -1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn key_cardinality_is_preserved() {
        let days = january_2010();
        let reference: Vec<f64> = (0..21).map(|i| 0.002 * f64::from(i - 10)).collect();

        let mut ids = vec![4i64; 21];
        ids.extend(vec![7i64; 21]);
        let mut panel_days = days.clone();
        panel_days.extend(days.clone());
        let values: Vec<Option<f64>> =
            (0..42).map(|i| Some(f64::from(i % 7) * 0.01 - 0.03)).collect();

        let partition = frame(ids.clone(), panel_days.clone(), values);
        let reference = reference_frame(days, reference);

        let out = CorrelationEngine::new(5).unwrap().correlate(&partition, &reference).unwrap();

        let out_ids: Vec<i64> =
            out.column(schema::ENTITY_ID).unwrap().i64().unwrap().into_no_null_iter().collect();
        let out_days: Vec<i32> =
            out.column(schema::DATE).unwrap().date().unwrap().into_no_null_iter().collect();

        let mut expected: Vec<(i64, i32)> = ids.into_iter().zip(panel_days).collect();
        expected.sort_unstable();
        let produced: Vec<(i64, i32)> = out_ids.into_iter().zip(out_days).collect();
        assert_eq!(produced, expected);
    }

    #[test]
    fn shorter_series_than_window_is_all_undefined() {
        let days = january_2010();
        let reference: Vec<f64> = (0..21).map(|i| 0.001 * f64::from(i)).collect();
        let partition = frame(
            vec![1i64; 3],
            days[..3].to_vec(),
            vec![Some(0.01), Some(0.02), Some(0.03)],
        );
        let reference = reference_frame(days, reference);

        let out =
            CorrelationEngine::new(524).unwrap().correlate(&partition, &reference).unwrap();
        assert_eq!(out.height(), 3);
        assert!(correlations_of(&out).iter().all(Option::is_none));
    }

    #[test]
    fn date_absent_from_reference_undefines_covering_windows() {
        let days = january_2010();
        let reference_values: Vec<f64> = (0..21).map(|i| 0.001 * f64::from(i * i)).collect();
        let entity_values: Vec<Option<f64>> =
            (0..21).map(|i| Some(0.002 * f64::from(i) - 0.01)).collect();

        let partition = frame(vec![1i64; 21], days.clone(), entity_values);
        // Drop one mid-month date from the reference.
        let hole = 10;
        let mut ref_days = days.clone();
        ref_days.remove(hole);
        let mut ref_values = reference_values;
        ref_values.remove(hole);
        let reference = reference_frame(ref_days, ref_values);

        let out = CorrelationEngine::new(5).unwrap().correlate(&partition, &reference).unwrap();
        let corrs = correlations_of(&out);

        // Every window covering the hole is undefined, neighbors are not.
        for i in hole..hole + 5 {
            assert!(corrs[i].is_none(), "offset {i} covers the hole");
        }
        assert!(corrs[hole - 1].is_some());
        assert!(corrs[hole + 5].is_some());
    }

    #[test]
    fn null_returns_undefine_covering_windows() {
        let days = january_2010();
        let reference: Vec<f64> = (0..21).map(|i| 0.001 * f64::from(i * i % 13)).collect();
        let mut values: Vec<Option<f64>> =
            (0..21).map(|i| Some(0.002 * f64::from(i) - 0.01)).collect();
        values[6] = None;

        let partition = frame(vec![1i64; 21], days.clone(), values);
        let reference = reference_frame(days, reference);

        let out = CorrelationEngine::new(5).unwrap().correlate(&partition, &reference).unwrap();
        let corrs = correlations_of(&out);

        for i in 6..11 {
            assert!(corrs[i].is_none(), "offset {i} covers the null return");
        }
        assert!(corrs[11].is_some());
    }

    #[test]
    fn constant_entity_series_is_undefined() {
        let days = january_2010();
        let reference: Vec<f64> = (0..21).map(|i| 0.001 * f64::from(i)).collect();
        let partition = frame(vec![1i64; 21], days.clone(), vec![Some(0.01); 21]);
        let reference = reference_frame(days, reference);

        let out = CorrelationEngine::new(5).unwrap().correlate(&partition, &reference).unwrap();
        assert!(correlations_of(&out).iter().all(Option::is_none));
    }

    #[test]
    fn unsorted_input_is_windowed_in_date_order() {
        let days = january_2010();
        let reference: Vec<f64> = (0..21).map(|i| 0.001 * f64::from(i)).collect();

        // Feed the entity's rows in reverse; windows must still run
        // oldest to newest.
        let rev_days: Vec<i32> = days.iter().rev().copied().collect();
        let rev_values: Vec<Option<f64>> =
            (0..21).rev().map(|i| Some(0.001 * f64::from(i))).collect();
        let partition = frame(vec![1i64; 21], rev_days, rev_values);
        let reference = reference_frame(days, reference);

        let out = CorrelationEngine::new(5).unwrap().correlate(&partition, &reference).unwrap();
        let corrs = correlations_of(&out);
        for i in 4..21 {
            assert_relative_eq!(corrs[i].unwrap(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn empty_partition_correlates_empty() {
        let days = january_2010();
        let reference: Vec<f64> = (0..21).map(|i| 0.001 * f64::from(i)).collect();
        let partition = frame(Vec::new(), Vec::new(), Vec::new());
        let reference = reference_frame(days, reference);

        let out = CorrelationEngine::new(5).unwrap().correlate(&partition, &reference).unwrap();
        assert_eq!(out.height(), 0);
        assert_eq!(
            out.get_column_names_str(),
            vec![schema::ENTITY_ID, schema::DATE, schema::CORRELATION]
        );
    }

    #[test]
    fn degenerate_window_is_rejected() {
        assert!(matches!(CorrelationEngine::new(0), Err(RollingError::InvalidWindow(0))));
        assert!(matches!(CorrelationEngine::new(1), Err(RollingError::InvalidWindow(1))));
    }

    #[test]
    fn missing_columns_are_reported() {
        let days = january_2010();
        let reference = reference_frame(days.clone(), vec![0.0; 21]);
        let no_returns = DataFrame::new(vec![
            Column::new(schema::ENTITY_ID.into(), vec![1i64]),
            Column::new(schema::DATE.into(), vec![days[0]]).cast(&DataType::Date).unwrap(),
        ])
        .unwrap();

        let engine = CorrelationEngine::new(5).unwrap();
        let err = engine.correlate(&no_returns, &reference).unwrap_err();
        assert!(matches!(err, RollingError::MissingColumn(name) if name == schema::RETURNS));

        let bare_reference =
            DataFrame::new(vec![Column::new(schema::RETURNS.into(), vec![0.0f64])]).unwrap();
        let err = engine.correlate(&no_returns, &bare_reference).unwrap_err();
        assert!(matches!(err, RollingError::MissingColumn(name) if name == schema::DATE));
    }

    #[test]
    fn float32_partition_is_accepted() {
        let days = january_2010();
        let reference: Vec<f64> = (0..21).map(|i| 0.001 * f64::from(i)).collect();
        let mut partition =
            frame(vec![1i64; 21], days.clone(), reference.iter().map(|v| Some(*v)).collect());
        let narrow = partition
            .column(schema::RETURNS)
            .unwrap()
            .cast(&DataType::Float32)
            .unwrap();
        partition.with_column(narrow).unwrap();
        let reference = reference_frame(days, reference);

        let out = CorrelationEngine::new(5).unwrap().correlate(&partition, &reference).unwrap();
        let corrs = correlations_of(&out);
        for i in 4..21 {
            // Float32 rounding perturbs the inputs, not the alignment.
            assert_relative_eq!(corrs[i].unwrap(), 1.0, epsilon = 1e-6);
        }
    }
}
