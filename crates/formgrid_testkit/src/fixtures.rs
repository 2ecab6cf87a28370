//! Fixture entity types and repository helpers.
//!
//! The fixtures model a small library-management data set: books with a
//! hidden foreign key and a price column, authors with plain text fields.

use formgrid_core::{
    Entity, EntityDescriptor, EntityId, FieldDescriptor, FieldKind, FieldValue, Repository,
    StorageError,
};
use formgrid_memory::MemoryRepository;
use std::sync::Arc;

/// A book row: integer identity, hidden foreign key, text and real fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Book {
    /// Backend-assigned identity.
    pub book_id: Option<EntityId>,
    /// Book title.
    pub title: String,
    /// Foreign key to the publisher; hidden from column display.
    pub publisher_id: Option<i64>,
    /// Category label.
    pub category: String,
    /// Price; optional.
    pub price: Option<f64>,
}

impl Book {
    /// Creates a book with an identity, for seeding.
    #[must_use]
    pub fn new(book_id: i64, title: &str, category: &str, price: f64) -> Self {
        Self {
            book_id: Some(EntityId::new(book_id)),
            title: title.into(),
            publisher_id: None,
            category: category.into(),
            price: Some(price),
        }
    }
}

impl Entity for Book {
    fn field(&self, name: &str) -> FieldValue {
        match name {
            "book_id" => self
                .book_id
                .map_or(FieldValue::Absent, |id| FieldValue::Integer(id.as_i64())),
            "title" => FieldValue::Text(self.title.clone()),
            "publisher_id" => self
                .publisher_id
                .map_or(FieldValue::Absent, FieldValue::Integer),
            "category" => FieldValue::Text(self.category.clone()),
            "price" => self.price.map_or(FieldValue::Absent, FieldValue::Real),
            _ => FieldValue::Absent,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) {
        match name {
            "title" => self.title = value.as_text().unwrap_or_default().to_string(),
            "publisher_id" => self.publisher_id = value.as_integer(),
            "category" => self.category = value.as_text().unwrap_or_default().to_string(),
            "price" => self.price = value.as_real(),
            _ => {}
        }
    }

    fn identity(&self) -> Option<EntityId> {
        self.book_id
    }

    fn assign_identity(&mut self, id: EntityId) {
        self.book_id = Some(id);
    }
}

/// The descriptor for [`Book`].
///
/// # Panics
///
/// Panics when the static declaration is malformed; descriptors fail fast
/// at startup.
#[must_use]
pub fn book_descriptor() -> Arc<EntityDescriptor> {
    EntityDescriptor::describe(
        "book",
        vec![
            FieldDescriptor::identity("book_id", FieldKind::Integer),
            FieldDescriptor::new("title", FieldKind::Text),
            FieldDescriptor::new("publisher_id", FieldKind::Integer).hidden(),
            FieldDescriptor::new("category", FieldKind::Text),
            FieldDescriptor::new("price", FieldKind::Real),
        ],
    )
    .expect("book descriptor is well-formed")
}

/// An author row: integer identity and two text fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Author {
    /// Backend-assigned identity.
    pub author_id: Option<EntityId>,
    /// Author name.
    pub name: String,
    /// Country of residence.
    pub country: String,
}

impl Author {
    /// Creates an author with an identity, for seeding.
    #[must_use]
    pub fn new(author_id: i64, name: &str, country: &str) -> Self {
        Self {
            author_id: Some(EntityId::new(author_id)),
            name: name.into(),
            country: country.into(),
        }
    }
}

impl Entity for Author {
    fn field(&self, name: &str) -> FieldValue {
        match name {
            "author_id" => self
                .author_id
                .map_or(FieldValue::Absent, |id| FieldValue::Integer(id.as_i64())),
            "name" => FieldValue::Text(self.name.clone()),
            "country" => FieldValue::Text(self.country.clone()),
            _ => FieldValue::Absent,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) {
        match name {
            "name" => self.name = value.as_text().unwrap_or_default().to_string(),
            "country" => self.country = value.as_text().unwrap_or_default().to_string(),
            _ => {}
        }
    }

    fn identity(&self) -> Option<EntityId> {
        self.author_id
    }

    fn assign_identity(&mut self, id: EntityId) {
        self.author_id = Some(id);
    }
}

/// The descriptor for [`Author`].
///
/// # Panics
///
/// Panics when the static declaration is malformed.
#[must_use]
pub fn author_descriptor() -> Arc<EntityDescriptor> {
    EntityDescriptor::describe(
        "author",
        vec![
            FieldDescriptor::identity("author_id", FieldKind::Integer),
            FieldDescriptor::new("name", FieldKind::Text),
            FieldDescriptor::new("country", FieldKind::Text),
        ],
    )
    .expect("author descriptor is well-formed")
}

/// A small book data set matching the filter scenarios.
#[must_use]
pub fn sample_books() -> Vec<Book> {
    vec![
        Book::new(1, "Dune", "Science Fiction", 9.99),
        Book::new(2, "Emma", "Classic", 5.0),
        Book::new(3, "Dracula", "Horror", 7.5),
    ]
}

/// A book repository seeded with [`sample_books`].
#[must_use]
pub fn seeded_book_repository() -> MemoryRepository<Book> {
    MemoryRepository::with_rows(sample_books())
}

/// A repository whose every call fails with a transport error.
///
/// Used to assert that storage failures propagate and leave the projection
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct BrokenRepository;

impl<T: Entity> Repository<T> for BrokenRepository {
    fn list_all(&self) -> Result<Vec<T>, StorageError> {
        Err(StorageError::unavailable("broken fixture"))
    }

    fn create(&mut self, _instance: T) -> Result<T, StorageError> {
        Err(StorageError::unavailable("broken fixture"))
    }

    fn update(&mut self, _instance: &T) -> Result<bool, StorageError> {
        Err(StorageError::unavailable("broken fixture"))
    }

    fn delete(&mut self, _id: EntityId) -> Result<bool, StorageError> {
        Err(StorageError::unavailable("broken fixture"))
    }
}
