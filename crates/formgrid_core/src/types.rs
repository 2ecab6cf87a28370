//! Core identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an entity instance.
///
/// Identities are assigned by the persistence backend (auto-increment
/// integer keys) and are immutable once assigned. A freshly built instance
/// that has not been created yet carries no identity, modeled as
/// `Option<EntityId>` on the instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub i64);

impl EntityId {
    /// Creates an entity ID from a raw value.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
