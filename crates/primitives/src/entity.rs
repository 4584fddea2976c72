//! Entity identity types.

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Unique identifier for an entity (e.g. a company) in the return panel.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    From,
    Into,
    Serialize,
    Deserialize,
)]
pub struct EntityId(pub i64);

impl EntityId {
    /// Create a new entity ID.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Partition index for this entity under a modulo-`count` scheme.
    ///
    /// Uses the Euclidean remainder, so negative identifiers still map
    /// into `0..count`.
    #[must_use]
    pub const fn partition(self, count: u32) -> u32 {
        self.0.rem_euclid(count as i64) as u32
    }
}
