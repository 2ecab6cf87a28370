//! Free-text substring filtering across all fields of an entity.
//!
//! Case-insensitive, locale-naive substring containment. No tokenization,
//! no scoring, no ranking: the result is a boolean per instance.

use crate::codec;
use crate::descriptor::EntityDescriptor;
use crate::entity::Entity;

/// A normalized search query.
///
/// Normalization (trim + lowercase) happens once, when the query text
/// changes, rather than once per scanned row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    normalized: String,
}

impl Query {
    /// Normalizes raw search text into a query.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            normalized: text.trim().to_lowercase(),
        }
    }

    /// Returns `true` when the query matches everything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    /// Returns the normalized query text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.normalized
    }
}

/// Decides whether an instance matches a query.
///
/// An empty query matches unconditionally. Otherwise every field is
/// formatted via the codec, lowercased, and checked for substring
/// containment in descriptor order; the first hit wins. The short-circuit
/// is an optimization only, the result is order-independent.
#[must_use]
pub fn matches<T: Entity>(instance: &T, descriptor: &EntityDescriptor, query: &Query) -> bool {
    if query.is_empty() {
        return true;
    }

    descriptor.fields().iter().any(|field| {
        codec::format(&instance.field(field.name()))
            .to_lowercase()
            .contains(query.as_str())
    })
}
