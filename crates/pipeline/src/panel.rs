//! Panel frame construction and artifact i/o.

use std::fs::File;
use std::path::Path;

use comove_primitives::{EntityReturn, ReferenceReturn, schema};
use polars::prelude::*;

use crate::PipelineError;

/// Build an entity panel frame from observation records.
///
/// # Errors
/// Returns an error if the frame cannot be assembled.
pub fn entity_frame(rows: &[EntityReturn]) -> Result<DataFrame, PipelineError> {
    let ids: Vec<i64> = rows.iter().map(|r| i64::from(r.entity_id)).collect();
    let days: Vec<i32> = rows.iter().map(|r| schema::date_to_days(r.date)).collect();
    let values: Vec<f64> = rows.iter().map(|r| r.value).collect();

    DataFrame::new(vec![
        Column::new(schema::ENTITY_ID.into(), ids),
        Column::new(schema::DATE.into(), days).cast(&DataType::Date)?,
        Column::new(schema::RETURNS.into(), values),
    ])
    .map_err(PipelineError::from)
}

/// Build a reference series frame from observation records.
///
/// # Errors
/// Returns an error if the frame cannot be assembled.
pub fn reference_frame(rows: &[ReferenceReturn]) -> Result<DataFrame, PipelineError> {
    let days: Vec<i32> = rows.iter().map(|r| schema::date_to_days(r.date)).collect();
    let values: Vec<f64> = rows.iter().map(|r| r.value).collect();

    DataFrame::new(vec![
        Column::new(schema::DATE.into(), days).cast(&DataType::Date)?,
        Column::new(schema::RETURNS.into(), values),
    ])
    .map_err(PipelineError::from)
}

/// Load the entity return panel, downcasting returns to `Float32`.
///
/// The downcast halves the panel's working-set size; downstream stages
/// compute in `f64` regardless, so results only move within float
/// rounding tolerance.
///
/// # Errors
/// Returns an error if the file cannot be read or lacks a returns column.
pub fn load_entity_panel(path: &Path) -> Result<DataFrame, PipelineError> {
    let mut df = read_parquet(path)?;
    downcast_returns(&mut df)?;
    Ok(df)
}

/// Load the market reference series, labeling its date axis and
/// downcasting returns to `Float32`.
///
/// # Errors
/// Returns an error if the file cannot be read, no date-typed column
/// exists to label, or the returns column is absent.
pub fn load_reference(path: &Path) -> Result<DataFrame, PipelineError> {
    let mut df = read_parquet(path)?;
    label_date_axis(&mut df)?;
    downcast_returns(&mut df)?;
    Ok(df)
}

/// Ensure the reference's date axis is named `date`.
///
/// Downstream alignment matches on the axis label, so an unlabeled
/// date-typed column gets the canonical name here.
fn label_date_axis(df: &mut DataFrame) -> Result<(), PipelineError> {
    if df.column(schema::DATE).is_ok() {
        return Ok(());
    }
    let unlabeled = df
        .get_columns()
        .iter()
        .find(|c| matches!(c.dtype(), DataType::Date))
        .map(|c| c.name().clone())
        .ok_or(PipelineError::MissingDateAxis)?;
    df.rename(unlabeled.as_str(), schema::DATE.into())?;
    Ok(())
}

fn downcast_returns(df: &mut DataFrame) -> Result<(), PipelineError> {
    let narrow = df
        .column(schema::RETURNS)
        .map_err(|_| PipelineError::MissingColumn(schema::RETURNS.to_string()))?
        .cast(&DataType::Float32)?;
    df.with_column(narrow)?;
    Ok(())
}

pub(crate) fn read_parquet(path: &Path) -> Result<DataFrame, PipelineError> {
    let file = File::open(path)
        .map_err(|source| PipelineError::Io { path: path.to_path_buf(), source })?;
    ParquetReader::new(file).finish().map_err(PipelineError::from)
}

pub(crate) fn write_parquet(path: &Path, df: &mut DataFrame) -> Result<(), PipelineError> {
    let file = File::create(path)
        .map_err(|source| PipelineError::Io { path: path.to_path_buf(), source })?;
    ParquetWriter::new(file).finish(df)?;
    Ok(())
}

pub(crate) fn write_result(path: &Path, df: &mut DataFrame) -> Result<(), PipelineError> {
    let mut file = File::create(path)
        .map_err(|source| PipelineError::Io { path: path.to_path_buf(), source })?;
    CsvWriter::new(&mut file).finish(df)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use comove_primitives::{Date, EntityId};

    use super::*;

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn sample_rows() -> Vec<EntityReturn> {
        vec![
            EntityReturn::new(EntityId::new(0), date("2023-02-13"), 0.05),
            EntityReturn::new(EntityId::new(1), date("2023-02-14"), -0.03),
        ]
    }

    #[test]
    fn entity_frame_schema() {
        let df = entity_frame(&sample_rows()).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.column(schema::ENTITY_ID).unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column(schema::DATE).unwrap().dtype(), &DataType::Date);
        assert_eq!(df.column(schema::RETURNS).unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn reference_frame_schema() {
        let rows = vec![
            ReferenceReturn::new(date("2023-02-13"), 0.001),
            ReferenceReturn::new(date("2023-02-14"), -0.002),
        ];
        let df = reference_frame(&rows).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.column(schema::DATE).unwrap().dtype(), &DataType::Date);
    }

    #[test]
    fn loading_downcasts_returns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.parquet");
        write_parquet(&path, &mut entity_frame(&sample_rows()).unwrap()).unwrap();

        let df = load_entity_panel(&path).unwrap();
        assert_eq!(df.column(schema::RETURNS).unwrap().dtype(), &DataType::Float32);
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn unlabeled_date_axis_is_labeled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reference.parquet");
        let mut df = DataFrame::new(vec![
            Column::new("idx".into(), vec![19_400i32, 19_401])
                .cast(&DataType::Date)
                .unwrap(),
            Column::new(schema::RETURNS.into(), vec![0.001f64, -0.002]),
        ])
        .unwrap();
        write_parquet(&path, &mut df).unwrap();

        let loaded = load_reference(&path).unwrap();
        assert!(loaded.column(schema::DATE).is_ok());
        assert_eq!(loaded.column(schema::RETURNS).unwrap().dtype(), &DataType::Float32);
    }

    #[test]
    fn labeled_date_axis_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reference.parquet");
        let rows = vec![ReferenceReturn::new(date("2023-02-13"), 0.001)];
        write_parquet(&path, &mut reference_frame(&rows).unwrap()).unwrap();

        let loaded = load_reference(&path).unwrap();
        assert_eq!(
            loaded.get_column_names_str(),
            vec![schema::DATE, schema::RETURNS]
        );
    }

    #[test]
    fn reference_without_date_axis_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reference.parquet");
        let mut df = DataFrame::new(vec![
            Column::new("idx".into(), vec![1i64, 2]),
            Column::new(schema::RETURNS.into(), vec![0.001f64, -0.002]),
        ])
        .unwrap();
        write_parquet(&path, &mut df).unwrap();

        let err = load_reference(&path).unwrap_err();
        assert!(matches!(err, PipelineError::MissingDateAxis));
    }

    #[test]
    fn missing_returns_column_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.parquet");
        let mut df =
            DataFrame::new(vec![Column::new(schema::ENTITY_ID.into(), vec![1i64])]).unwrap();
        write_parquet(&path, &mut df).unwrap();

        let err = load_entity_panel(&path).unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumn(name) if name == schema::RETURNS));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_entity_panel(&dir.path().join("nope.parquet")).unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
    }
}
