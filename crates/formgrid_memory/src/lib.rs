//! # FormGrid Memory
//!
//! An in-memory [`Repository`] implementation.
//!
//! Suitable for:
//! - unit and integration tests
//! - demos and ephemeral data sets that don't need persistence
//!
//! Rows are kept in a `BTreeMap` keyed by identity, so `list_all` returns
//! them in ascending identity order. Identities are assigned on create the
//! way an auto-increment column would: one past the highest identity ever
//! stored.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use formgrid_core::{Entity, EntityId, Repository, StorageError};
use std::collections::BTreeMap;
use tracing::trace;

/// An in-memory repository for one entity type.
///
/// # Example
///
/// ```rust,ignore
/// let mut repo: MemoryRepository<Book> = MemoryRepository::new();
/// let created = repo.create(book)?;          // identity assigned
/// assert!(repo.update(&created)?);
/// assert!(repo.delete(created.identity().unwrap())?);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository<T: Entity> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T: Entity> MemoryRepository<T> {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Creates a repository seeded with existing rows.
    ///
    /// Rows without an identity are assigned one, in order.
    #[must_use]
    pub fn with_rows(rows: Vec<T>) -> Self {
        let mut repo = Self::new();
        for row in rows {
            repo.store(row);
        }
        repo
    }

    /// Returns the number of stored rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when no rows are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the row with the given identity.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.rows.get(&id.as_i64())
    }

    fn store(&mut self, mut row: T) -> T {
        let id = match row.identity() {
            Some(id) => {
                // keep the counter ahead of caller-supplied identities
                self.next_id = self.next_id.max(id.as_i64());
                id
            }
            None => {
                self.next_id += 1;
                let id = EntityId::new(self.next_id);
                row.assign_identity(id);
                id
            }
        };
        self.rows.insert(id.as_i64(), row.clone());
        row
    }
}

impl<T: Entity> Repository<T> for MemoryRepository<T> {
    fn list_all(&self) -> Result<Vec<T>, StorageError> {
        trace!(rows = self.rows.len(), "list_all");
        Ok(self.rows.values().cloned().collect())
    }

    fn create(&mut self, instance: T) -> Result<T, StorageError> {
        let stored = self.store(instance);
        trace!(id = ?stored.identity(), "create");
        Ok(stored)
    }

    fn update(&mut self, instance: &T) -> Result<bool, StorageError> {
        let Some(id) = instance.identity() else {
            return Ok(false);
        };
        let found = self.rows.contains_key(&id.as_i64());
        if found {
            self.rows.insert(id.as_i64(), instance.clone());
        }
        trace!(%id, found, "update");
        Ok(found)
    }

    fn delete(&mut self, id: EntityId) -> Result<bool, StorageError> {
        let found = self.rows.remove(&id.as_i64()).is_some();
        trace!(%id, found, "delete");
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formgrid_core::FieldValue;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Note {
        id: Option<EntityId>,
        body: String,
    }

    impl Note {
        fn new(body: &str) -> Self {
            Self {
                id: None,
                body: body.into(),
            }
        }
    }

    impl Entity for Note {
        fn field(&self, name: &str) -> FieldValue {
            match name {
                "id" => self
                    .id
                    .map_or(FieldValue::Absent, |id| FieldValue::Integer(id.as_i64())),
                "body" => FieldValue::Text(self.body.clone()),
                _ => FieldValue::Absent,
            }
        }

        fn set_field(&mut self, name: &str, value: FieldValue) {
            if name == "body" {
                self.body = value.as_text().unwrap_or_default().to_string();
            }
        }

        fn identity(&self) -> Option<EntityId> {
            self.id
        }

        fn assign_identity(&mut self, id: EntityId) {
            self.id = Some(id);
        }
    }

    #[test]
    fn create_assigns_ascending_identities() {
        let mut repo = MemoryRepository::new();
        let a = repo.create(Note::new("a")).unwrap();
        let b = repo.create(Note::new("b")).unwrap();

        assert_eq!(a.identity(), Some(EntityId::new(1)));
        assert_eq!(b.identity(), Some(EntityId::new(2)));
    }

    #[test]
    fn create_honors_caller_supplied_identity() {
        let mut repo = MemoryRepository::new();
        let mut note = Note::new("pinned");
        note.assign_identity(EntityId::new(10));

        let stored = repo.create(note).unwrap();
        assert_eq!(stored.identity(), Some(EntityId::new(10)));

        // counter moved past the supplied identity
        let next = repo.create(Note::new("after")).unwrap();
        assert_eq!(next.identity(), Some(EntityId::new(11)));
    }

    #[test]
    fn list_all_returns_rows_in_identity_order() {
        let mut repo = MemoryRepository::new();
        let mut late = Note::new("late");
        late.assign_identity(EntityId::new(5));
        repo.create(late).unwrap();
        repo.create(Note::new("after")).unwrap(); // id 6
        let mut early = Note::new("early");
        early.assign_identity(EntityId::new(1));
        repo.create(early).unwrap();

        let bodies: Vec<_> = repo
            .list_all()
            .unwrap()
            .into_iter()
            .map(|n| n.body)
            .collect();
        assert_eq!(bodies, ["early", "late", "after"]);
    }

    #[test]
    fn update_replaces_existing_row() {
        let mut repo = MemoryRepository::new();
        let mut note = repo.create(Note::new("draft")).unwrap();
        note.body = "final".into();

        assert!(repo.update(&note).unwrap());
        assert_eq!(repo.get(note.identity().unwrap()).unwrap().body, "final");
    }

    #[test]
    fn update_of_absent_row_returns_false() {
        let mut repo = MemoryRepository::<Note>::new();
        let mut note = Note::new("ghost");
        note.assign_identity(EntityId::new(9));
        assert!(!repo.update(&note).unwrap());

        // an instance without identity addresses nothing
        assert!(!repo.update(&Note::new("nobody")).unwrap());
    }

    #[test]
    fn delete_is_idempotent() {
        let mut repo = MemoryRepository::new();
        let note = repo.create(Note::new("gone soon")).unwrap();
        let id = note.identity().unwrap();

        assert!(repo.delete(id).unwrap());
        assert!(!repo.delete(id).unwrap());
        assert!(repo.is_empty());
    }

    #[test]
    fn with_rows_seeds_and_assigns_missing_identities() {
        let mut pinned = Note::new("pinned");
        pinned.assign_identity(EntityId::new(3));
        let repo = MemoryRepository::with_rows(vec![pinned, Note::new("fresh")]);

        assert_eq!(repo.len(), 2);
        assert_eq!(repo.get(EntityId::new(3)).unwrap().body, "pinned");
        assert_eq!(repo.get(EntityId::new(4)).unwrap().body, "fresh");
    }
}
