//! Return observation records.

use serde::{Deserialize, Serialize};

use crate::{Date, EntityId};

/// A single observed return for one entity on one date.
///
/// An entity panel is a collection of these, keyed uniquely by
/// `(entity_id, date)`; dates per entity may be an arbitrary,
/// non-contiguous subset of the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityReturn {
    /// Entity the observation belongs to.
    pub entity_id: EntityId,
    /// Observation date.
    pub date: Date,
    /// Return value.
    pub value: f64,
}

impl EntityReturn {
    /// Create a new observation.
    #[must_use]
    pub const fn new(entity_id: EntityId, date: Date, value: f64) -> Self {
        Self { entity_id, date, value }
    }
}

/// A single reference (market) return on one date.
///
/// A reference series holds one of these per calendar date over its
/// covered range, keyed uniquely by date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceReturn {
    /// Observation date.
    pub date: Date,
    /// Return value.
    pub value: f64,
}

impl ReferenceReturn {
    /// Create a new reference observation.
    #[must_use]
    pub const fn new(date: Date, value: f64) -> Self {
        Self { date, value }
    }
}
