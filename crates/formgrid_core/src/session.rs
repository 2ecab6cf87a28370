//! The form session: selection, edit buffers, validated commits.
//!
//! A [`FormSession`] mediates between user-edited text and committed entity
//! instances. It is a two-mode state machine: create mode when nothing is
//! selected, edit mode otherwise. The session is the only component that
//! calls the repository's mutating operations.

use crate::codec;
use crate::descriptor::EntityDescriptor;
use crate::entity::Entity;
use crate::error::{CommitError, RepositoryError};
use crate::projection::Projection;
use crate::repository::{EditCapability, GatedRepository, Repository};
use crate::value::FieldValue;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// The session mode, selected by whether an instance is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// No selection: a commit creates a new instance.
    Create,
    /// An instance is selected: a commit updates it by identity.
    Edit,
}

/// One renderable form input: field name, current buffer text, editability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField<'a> {
    /// The field name.
    pub name: &'a str,
    /// The current raw buffer text.
    pub text: &'a str,
    /// Whether the field accepts input.
    pub editable: bool,
}

/// Mediates selection → buffer population → validated commit → repository
/// call → projection refresh for one entity type.
///
/// The session holds a clone of the selected instance and reconciles with
/// the projection by identity; it never borrows the projection across user
/// events.
pub struct FormSession<T: Entity, R: Repository<T>> {
    descriptor: Arc<EntityDescriptor>,
    repository: GatedRepository<T, R>,
    selected: Option<T>,
    buffers: HashMap<String, String>,
}

impl<T: Entity, R: Repository<T>> FormSession<T, R> {
    /// Creates a session in create mode.
    pub fn new(
        descriptor: Arc<EntityDescriptor>,
        repository: R,
        capability: EditCapability,
    ) -> Self {
        Self {
            descriptor,
            repository: GatedRepository::new(repository, capability),
            selected: None,
            buffers: HashMap::new(),
        }
    }

    /// Returns the descriptor this session edits.
    #[must_use]
    pub fn descriptor(&self) -> &Arc<EntityDescriptor> {
        &self.descriptor
    }

    /// Returns the current mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        if self.selected.is_some() {
            Mode::Edit
        } else {
            Mode::Create
        }
    }

    /// Returns the selected instance, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&T> {
        self.selected.as_ref()
    }

    /// Returns the capability handle.
    #[must_use]
    pub fn capability(&self) -> &EditCapability {
        self.repository.capability()
    }

    /// Selects an instance (edit mode) or deselects (create mode).
    ///
    /// Entering edit mode populates every non-identity buffer from the
    /// instance via the codec; entering create mode clears all buffers.
    pub fn select(&mut self, instance: Option<T>) {
        match instance {
            Some(instance) => {
                self.buffers = self
                    .descriptor
                    .form_fields()
                    .map(|f| (f.name().to_string(), codec::format(&instance.field(f.name()))))
                    .collect();
                self.selected = Some(instance);
            }
            None => self.reset(),
        }
    }

    /// Overwrites one field buffer. Pure state update.
    pub fn set_buffer(&mut self, field: impl Into<String>, text: impl Into<String>) {
        self.buffers.insert(field.into(), text.into());
    }

    /// Returns one field buffer's current text.
    #[must_use]
    pub fn buffer(&self, field: &str) -> &str {
        self.buffers.get(field).map_or("", String::as_str)
    }

    /// Returns the renderable form inputs: every non-identity field in
    /// declaration order with its current buffer text.
    #[must_use]
    pub fn form_fields(&self) -> Vec<FormField<'_>> {
        self.descriptor
            .form_fields()
            .map(|f| FormField {
                name: f.name(),
                text: self.buffer(f.name()),
                editable: f.is_editable(),
            })
            .collect()
    }

    /// Reloads the projection backing from the repository.
    pub fn refresh(&mut self, projection: &mut Projection<T>) -> Result<(), RepositoryError> {
        let items = self.repository.list_all()?;
        projection.set_backing(items);
        Ok(())
    }

    /// Validates the buffers and commits them as a create or an update.
    ///
    /// Parse failures abort before any repository call; storage failures
    /// leave the projection backing unchanged. On success the session
    /// resets to create mode and the committed instance is returned. An
    /// update against a vanished row reports [`CommitError::NotFound`] and
    /// keeps the selection so the caller can refresh.
    pub fn commit(&mut self, projection: &mut Projection<T>) -> Result<T, CommitError> {
        if !self.capability().can_mutate() {
            return Err(CommitError::PermissionDenied);
        }

        // Parse every non-identity buffer up front; no partial commit.
        let mut parsed = Vec::new();
        for field in self.descriptor.form_fields() {
            let value = codec::parse(field, self.buffer(field.name()))?;
            parsed.push((field.name().to_string(), value));
        }

        match self.selected.clone() {
            None => {
                let mut instance = T::default();
                apply(&mut instance, parsed);
                let created = self.repository.create(instance)?;
                debug!(
                    entity = self.descriptor.type_name(),
                    id = ?created.identity(),
                    "committed create"
                );
                projection.insert(created.clone());
                self.reset();
                Ok(created)
            }
            Some(selected) => {
                let mut updated = selected;
                apply(&mut updated, parsed);
                if !self.repository.update(&updated)? {
                    // Row vanished underneath the selection; keep it so the
                    // caller can refresh and re-find.
                    return Err(CommitError::NotFound);
                }
                debug!(
                    entity = self.descriptor.type_name(),
                    id = ?updated.identity(),
                    "committed update"
                );
                projection.replace(updated.clone());
                self.reset();
                Ok(updated)
            }
        }
    }

    /// Deletes the selected instance.
    ///
    /// Valid only in edit mode. On success the entry is removed from the
    /// projection and the session resets to create mode. When the row was
    /// already gone the stale selection is cleared and
    /// [`CommitError::NotFound`] is reported.
    pub fn delete_selected(
        &mut self,
        projection: &mut Projection<T>,
    ) -> Result<(), CommitError> {
        if !self.capability().can_mutate() {
            return Err(CommitError::PermissionDenied);
        }

        let id = self
            .selected
            .as_ref()
            .and_then(Entity::identity)
            .ok_or(CommitError::NoSelection)?;

        if !self.repository.delete(id)? {
            self.reset();
            return Err(CommitError::NotFound);
        }

        debug!(
            entity = self.descriptor.type_name(),
            %id,
            "deleted selection"
        );
        projection.remove(id);
        self.reset();
        Ok(())
    }

    /// Resets to create mode without touching the repository.
    pub fn clear(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.selected = None;
        self.buffers.clear();
    }
}

fn apply<T: Entity>(instance: &mut T, parsed: Vec<(String, FieldValue)>) {
    for (name, value) in parsed {
        instance.set_field(&name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FieldDescriptor;
    use crate::error::StorageError;
    use crate::types::EntityId;
    use crate::value::FieldKind;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Book {
        id: Option<EntityId>,
        title: String,
        price: Option<f64>,
    }

    impl Book {
        fn new(id: i64, title: &str, price: f64) -> Self {
            Self {
                id: Some(EntityId::new(id)),
                title: title.into(),
                price: Some(price),
            }
        }
    }

    impl Entity for Book {
        fn field(&self, name: &str) -> FieldValue {
            match name {
                "id" => self
                    .id
                    .map_or(FieldValue::Absent, |id| FieldValue::Integer(id.as_i64())),
                "title" => FieldValue::Text(self.title.clone()),
                "price" => self.price.map_or(FieldValue::Absent, FieldValue::Real),
                _ => FieldValue::Absent,
            }
        }

        fn set_field(&mut self, name: &str, value: FieldValue) {
            match name {
                "title" => self.title = value.as_text().unwrap_or_default().to_string(),
                "price" => self.price = value.as_real(),
                _ => {}
            }
        }

        fn identity(&self) -> Option<EntityId> {
            self.id
        }

        fn assign_identity(&mut self, id: EntityId) {
            self.id = Some(id);
        }
    }

    /// Vector-backed repository; `broken` makes every call fail.
    #[derive(Default)]
    struct VecRepository {
        rows: Vec<Book>,
        next_id: i64,
        broken: bool,
    }

    impl VecRepository {
        fn seeded(rows: Vec<Book>) -> Self {
            let next_id = rows
                .iter()
                .filter_map(|r| r.identity())
                .map(EntityId::as_i64)
                .max()
                .unwrap_or(0);
            Self {
                rows,
                next_id,
                broken: false,
            }
        }

        fn check(&self) -> Result<(), StorageError> {
            if self.broken {
                Err(StorageError::unavailable("backend offline"))
            } else {
                Ok(())
            }
        }
    }

    impl Repository<Book> for VecRepository {
        fn list_all(&self) -> Result<Vec<Book>, StorageError> {
            self.check()?;
            Ok(self.rows.clone())
        }

        fn create(&mut self, mut instance: Book) -> Result<Book, StorageError> {
            self.check()?;
            self.next_id += 1;
            instance.assign_identity(EntityId::new(self.next_id));
            self.rows.push(instance.clone());
            Ok(instance)
        }

        fn update(&mut self, instance: &Book) -> Result<bool, StorageError> {
            self.check()?;
            let id = instance.identity();
            match self.rows.iter_mut().find(|r| r.identity() == id) {
                Some(row) => {
                    *row = instance.clone();
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        fn delete(&mut self, id: EntityId) -> Result<bool, StorageError> {
            self.check()?;
            let before = self.rows.len();
            self.rows.retain(|r| r.identity() != Some(id));
            Ok(self.rows.len() != before)
        }
    }

    fn descriptor() -> Arc<EntityDescriptor> {
        EntityDescriptor::describe(
            "book",
            vec![
                FieldDescriptor::identity("id", FieldKind::Integer),
                FieldDescriptor::new("title", FieldKind::Text),
                FieldDescriptor::new("price", FieldKind::Real),
            ],
        )
        .unwrap()
    }

    fn setup(
        rows: Vec<Book>,
        capability: EditCapability,
    ) -> (FormSession<Book, VecRepository>, Projection<Book>) {
        let descriptor = descriptor();
        let mut projection = Projection::new(descriptor.clone());
        projection.set_backing(rows.clone());
        let session = FormSession::new(descriptor, VecRepository::seeded(rows), capability);
        (session, projection)
    }

    fn two_books() -> Vec<Book> {
        vec![Book::new(1, "Dune", 9.99), Book::new(2, "Emma", 5.0)]
    }

    #[test]
    fn selecting_populates_buffers_without_identity() {
        let (mut session, _projection) = setup(two_books(), EditCapability::granted());

        session.select(Some(Book::new(1, "Dune", 9.99)));
        assert_eq!(session.mode(), Mode::Edit);
        assert_eq!(session.buffer("title"), "Dune");
        assert_eq!(session.buffer("price"), "9.99");
        assert_eq!(session.buffer("id"), "");

        session.select(None);
        assert_eq!(session.mode(), Mode::Create);
        assert_eq!(session.buffer("title"), "");
    }

    #[test]
    fn form_fields_follow_declaration_order() {
        let (mut session, _projection) = setup(Vec::new(), EditCapability::granted());
        session.set_buffer("title", "X");

        let fields = session.form_fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "title");
        assert_eq!(fields[0].text, "X");
        assert!(fields[0].editable);
        assert_eq!(fields[1].name, "price");
        assert_eq!(fields[1].text, "");
    }

    #[test]
    fn create_commit_appends_authoritative_instance() {
        let (mut session, mut projection) = setup(two_books(), EditCapability::granted());

        session.set_buffer("title", "Dracula");
        session.set_buffer("price", "7.5");
        let created = session.commit(&mut projection).unwrap();

        assert_eq!(created.identity(), Some(EntityId::new(3)));
        assert_eq!(projection.backing().len(), 3);
        assert_eq!(projection.backing()[2].title, "Dracula");
        // session reset to create mode with empty buffers
        assert_eq!(session.mode(), Mode::Create);
        assert_eq!(session.buffer("title"), "");
    }

    #[test]
    fn invalid_buffer_aborts_commit_before_any_repository_call() {
        let (mut session, mut projection) = setup(two_books(), EditCapability::granted());

        session.set_buffer("title", "X");
        session.set_buffer("price", "abc");
        let err = session.commit(&mut projection).unwrap_err();

        match err {
            CommitError::Validation(parse) => assert_eq!(parse.field, "price"),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(projection.backing().len(), 2);
        // buffers preserved for correction
        assert_eq!(session.buffer("title"), "X");
        assert_eq!(session.buffer("price"), "abc");
    }

    #[test]
    fn edit_commit_replaces_matching_entry() {
        let (mut session, mut projection) = setup(two_books(), EditCapability::granted());

        session.select(Some(Book::new(2, "Emma", 5.0)));
        session.set_buffer("price", "6.25");
        let updated = session.commit(&mut projection).unwrap();

        assert_eq!(updated.identity(), Some(EntityId::new(2)));
        assert_eq!(projection.find(EntityId::new(2)).unwrap().price, Some(6.25));
        assert_eq!(session.mode(), Mode::Create);
    }

    #[test]
    fn edit_commit_on_vanished_row_reports_not_found_and_keeps_selection() {
        let (mut session, mut projection) = setup(two_books(), EditCapability::granted());

        // selection refers to a row the repository never had
        session.select(Some(Book::new(99, "Ghost", 1.0)));
        session.set_buffer("title", "Ghost II");
        let err = session.commit(&mut projection).unwrap_err();

        assert!(matches!(err, CommitError::NotFound));
        assert_eq!(projection.backing().len(), 2);
        assert_eq!(session.mode(), Mode::Edit);
    }

    #[test]
    fn commit_without_capability_is_refused_before_validation() {
        let (mut session, mut projection) = setup(two_books(), EditCapability::denied());

        session.set_buffer("price", "not a number");
        let err = session.commit(&mut projection).unwrap_err();

        // permission is checked first, so the bad buffer is never parsed
        assert!(matches!(err, CommitError::PermissionDenied));
        assert_eq!(projection.backing().len(), 2);
    }

    #[test]
    fn storage_failure_leaves_projection_unchanged() {
        let descriptor = descriptor();
        let mut projection = Projection::new(descriptor.clone());
        projection.set_backing(two_books());
        let mut repo = VecRepository::seeded(two_books());
        repo.broken = true;
        let mut session = FormSession::new(descriptor, repo, EditCapability::granted());

        session.set_buffer("title", "Dracula");
        let err = session.commit(&mut projection).unwrap_err();

        assert!(matches!(err, CommitError::Storage(_)));
        assert_eq!(projection.backing().len(), 2);
    }

    #[test]
    fn delete_selected_removes_entry_and_resets() {
        let (mut session, mut projection) = setup(two_books(), EditCapability::granted());

        session.select(Some(Book::new(2, "Emma", 5.0)));
        session.delete_selected(&mut projection).unwrap();

        assert!(projection.find(EntityId::new(2)).is_none());
        assert_eq!(projection.backing().len(), 1);
        assert_eq!(session.mode(), Mode::Create);
    }

    #[test]
    fn delete_without_capability_is_refused() {
        let (mut session, mut projection) = setup(two_books(), EditCapability::denied());

        session.select(Some(Book::new(2, "Emma", 5.0)));
        let err = session.delete_selected(&mut projection).unwrap_err();

        assert!(matches!(err, CommitError::PermissionDenied));
        assert_eq!(projection.backing().len(), 2);
        // selection untouched: no state change on refusal
        assert_eq!(session.mode(), Mode::Edit);
    }

    #[test]
    fn delete_in_create_mode_reports_no_selection() {
        let (mut session, mut projection) = setup(two_books(), EditCapability::granted());
        let err = session.delete_selected(&mut projection).unwrap_err();
        assert!(matches!(err, CommitError::NoSelection));
    }

    #[test]
    fn delete_of_vanished_row_clears_stale_selection() {
        let (mut session, mut projection) = setup(two_books(), EditCapability::granted());

        session.select(Some(Book::new(99, "Ghost", 1.0)));
        let err = session.delete_selected(&mut projection).unwrap_err();

        assert!(matches!(err, CommitError::NotFound));
        assert_eq!(session.mode(), Mode::Create);
        assert_eq!(projection.backing().len(), 2);
    }

    #[test]
    fn refresh_pulls_backing_from_repository() {
        let (mut session, mut projection) = setup(two_books(), EditCapability::granted());

        projection.set_backing(Vec::new());
        session.refresh(&mut projection).unwrap();
        assert_eq!(projection.backing().len(), 2);
    }

    #[test]
    fn clear_resets_without_repository_calls() {
        let (mut session, _projection) = setup(two_books(), EditCapability::denied());

        session.select(Some(Book::new(1, "Dune", 9.99)));
        session.clear();
        assert_eq!(session.mode(), Mode::Create);
        assert_eq!(session.buffer("title"), "");
    }

    #[test]
    fn empty_price_commits_as_absent() {
        let (mut session, mut projection) = setup(Vec::new(), EditCapability::granted());

        session.set_buffer("title", "Pamphlet");
        let created = session.commit(&mut projection).unwrap();
        assert_eq!(created.price, None);
        assert_eq!(created.title, "Pamphlet");
    }
}
