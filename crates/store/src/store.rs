//! Hive-style partitioned parquet store.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use comove_primitives::{EntityId, schema};
use polars::prelude::*;

use crate::StoreError;

const PART_FILE: &str = "part-0.parquet";

/// Outcome of one partitioned write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    /// Total rows written across all partitions.
    pub rows: usize,
    /// Number of partitions replaced by this write.
    pub partitions: usize,
}

/// Parquet store partitioned by `entity_id mod P`.
///
/// Each partition value present in a write gets its own
/// `partition=<index>` directory under the root, holding that partition's
/// rows plus a redundant `partition` column. Writes replace whole
/// partitions: directories for partition values present in the new data
/// are deleted and rewritten, all others are left untouched.
#[derive(Debug, Clone)]
pub struct PartitionedStore {
    root: PathBuf,
    partition_count: u32,
}

impl PartitionedStore {
    /// Create a store rooted at `root` with `partition_count` partitions.
    ///
    /// The root directory is created lazily on first write.
    ///
    /// # Errors
    /// Returns an error if `partition_count` is zero.
    pub fn new(root: impl Into<PathBuf>, partition_count: u32) -> Result<Self, StoreError> {
        if partition_count == 0 {
            return Err(StoreError::InvalidPartitionCount(0));
        }
        Ok(Self { root: root.into(), partition_count })
    }

    /// Root directory of the store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Configured partition count.
    #[must_use]
    pub const fn partition_count(&self) -> u32 {
        self.partition_count
    }

    /// Write a panel, replacing every partition present in it.
    ///
    /// Rows are grouped by `entity_id mod partition_count`. Each group is
    /// written to its partition directory through a temporary file that is
    /// renamed into place once fully flushed. Partition values with no
    /// rows in `panel` keep whatever the store already holds for them.
    ///
    /// # Errors
    /// Returns an error if the `entity_id` column is absent or contains
    /// nulls, or on any filesystem or encoding failure.
    pub fn write(&self, panel: &DataFrame) -> Result<WriteSummary, StoreError> {
        let entities = panel
            .column(schema::ENTITY_ID)
            .map_err(|_| StoreError::MissingColumn(schema::ENTITY_ID.to_string()))?
            .cast(&DataType::Int64)?;

        let mut partitions: Vec<u32> = Vec::with_capacity(panel.height());
        let mut groups: BTreeMap<u32, Vec<IdxSize>> = BTreeMap::new();
        for (row, entity) in entities.i64()?.into_iter().enumerate() {
            let Some(entity) = entity else {
                return Err(StoreError::NullEntityId { row });
            };
            let value = EntityId::new(entity).partition(self.partition_count);
            partitions.push(value);
            groups.entry(value).or_default().push(row as IdxSize);
        }

        let mut stamped = panel.clone();
        stamped.with_column(Column::new(schema::PARTITION.into(), partitions))?;

        fs::create_dir_all(&self.root)
            .map_err(|source| StoreError::Io { path: self.root.clone(), source })?;

        let written = groups.len();
        for (value, rows) in groups {
            let part = stamped.take(&IdxCa::from_vec("rows".into(), rows))?;
            self.replace_partition(value, part)?;
        }

        Ok(WriteSummary { rows: panel.height(), partitions: written })
    }

    /// Read back one partition, or `None` if the store holds no data for
    /// that index. A hole in modulo space is expected for sparse entity
    /// populations and is not an error.
    ///
    /// All parquet part files in the partition directory are read in name
    /// order and stacked, so partitions written by other producers in
    /// several parts come back as one frame.
    ///
    /// # Errors
    /// Returns an error if `index` is outside `0..partition_count`, or on
    /// any filesystem or decoding failure.
    pub fn read_partition(&self, index: u32) -> Result<Option<DataFrame>, StoreError> {
        if index >= self.partition_count {
            return Err(StoreError::InvalidPartitionIndex {
                index,
                count: self.partition_count,
            });
        }

        let dir = self.partition_dir(index);
        if !dir.is_dir() {
            return Ok(None);
        }

        let entries = fs::read_dir(&dir)
            .map_err(|source| StoreError::Io { path: dir.clone(), source })?;
        let mut parts: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io { path: dir.clone(), source })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "parquet") {
                parts.push(path);
            }
        }
        parts.sort();

        let mut stacked: Option<DataFrame> = None;
        for path in parts {
            let file = File::open(&path)
                .map_err(|source| StoreError::Io { path: path.clone(), source })?;
            let df = ParquetReader::new(file).finish()?;
            match stacked.as_mut() {
                Some(acc) => {
                    acc.vstack_mut(&df)?;
                }
                None => stacked = Some(df),
            }
        }
        Ok(stacked)
    }

    fn partition_dir(&self, index: u32) -> PathBuf {
        self.root.join(format!("partition={index}"))
    }

    fn replace_partition(&self, index: u32, mut part: DataFrame) -> Result<(), StoreError> {
        let dir = self.partition_dir(index);
        if dir.exists() {
            fs::remove_dir_all(&dir)
                .map_err(|source| StoreError::Io { path: dir.clone(), source })?;
        }
        fs::create_dir_all(&dir)
            .map_err(|source| StoreError::Io { path: dir.clone(), source })?;

        // Stage to a temporary name so a crash mid-write never leaves a
        // half-written part file behind the final name.
        let tmp = dir.join(format!("{PART_FILE}.tmp"));
        let file =
            File::create(&tmp).map_err(|source| StoreError::Io { path: tmp.clone(), source })?;
        ParquetWriter::new(file).finish(&mut part)?;

        let target = dir.join(PART_FILE);
        fs::rename(&tmp, &target)
            .map_err(|source| StoreError::Io { path: target, source })?;
        Ok(())
    }
}
