//! Canonical column names and the physical date representation.
//!
//! Every crate in the workspace exchanges panels as polars frames using
//! these column names. Dates travel as days since the Unix epoch (the
//! physical representation of the polars `Date` dtype).

use chrono::{Duration, NaiveDate};

/// Entity identifier column (Int64).
pub const ENTITY_ID: &str = "entity_id";

/// Calendar date column (Date).
pub const DATE: &str = "date";

/// Return value column (Float32 after the pipeline downcast).
pub const RETURNS: &str = "returns";

/// Derived partition column persisted by the store (UInt32).
pub const PARTITION: &str = "partition";

/// Rolling correlation output column (Float64).
pub const CORRELATION: &str = "correlation";

const EPOCH: NaiveDate = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();

/// Convert a calendar date to days since the Unix epoch.
#[must_use]
pub fn date_to_days(date: NaiveDate) -> i32 {
    (date - EPOCH).num_days() as i32
}

/// Convert days since the Unix epoch back to a calendar date.
#[must_use]
pub fn days_to_date(days: i32) -> NaiveDate {
    EPOCH + Duration::days(i64::from(days))
}
