//! FormGrid demo - a scripted library-management session.
//!
//! This demo drives the generic engine the way an interactive shell would:
//! - two unrelated entity types (authors, books) managed by the same code
//! - live substring filtering over all columns
//! - create/update/delete through a form session
//! - an edit capability that is revoked until "login"
//!
//! Run with: cargo run -p library_app

use formgrid_core::{
    CommitError, EditCapability, Entity, EntityDescriptor, EntityId, FieldDescriptor, FieldKind,
    FieldValue, FormSession, Projection, Repository,
};
use formgrid_memory::MemoryRepository;
use std::error::Error;
use std::sync::Arc;

/// An author row.
#[derive(Debug, Clone, Default)]
struct Author {
    author_id: Option<EntityId>,
    name: String,
    country: String,
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

/// A book row with a hidden foreign key column.
#[derive(Debug, Clone, Default)]
struct Book {
    book_id: Option<EntityId>,
    title: String,
    publisher_id: Option<i64>,
    category: String,
    price: Option<f64>,
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

fn author_descriptor() -> Result<Arc<EntityDescriptor>, Box<dyn Error>> {
    Ok(EntityDescriptor::describe(
        "author",
        vec![
            FieldDescriptor::identity("author_id", FieldKind::Integer),
            FieldDescriptor::new("name", FieldKind::Text),
            FieldDescriptor::new("country", FieldKind::Text),
        ],
    )?)
}

fn book_descriptor() -> Result<Arc<EntityDescriptor>, Box<dyn Error>> {
    Ok(EntityDescriptor::describe(
        "book",
        vec![
            FieldDescriptor::identity("book_id", FieldKind::Integer),
            FieldDescriptor::new("title", FieldKind::Text),
            FieldDescriptor::new("publisher_id", FieldKind::Integer).hidden(),
            FieldDescriptor::new("category", FieldKind::Text),
            FieldDescriptor::new("price", FieldKind::Real),
        ],
    )?)
}

/// Prints the projection's visible columns as a text table.
fn print_table<T: Entity>(projection: &Projection<T>) {
    let rows = projection.display_rows();
    println!("--- {} ({} shown) ---", projection.descriptor().type_name(), rows.len());
    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        println!("  {}", cells.join("  "));
    }
}

fn seed_books() -> MemoryRepository<Book> {
    let mut repo = MemoryRepository::new();
    for (title, category, price) in [
        ("Dune", "Science Fiction", 9.99),
        ("Emma", "Classic", 5.0),
        ("Dracula", "Horror", 7.5),
    ] {
        let book = Book {
            title: title.into(),
            publisher_id: Some(1),
            category: category.into(),
            price: Some(price),
            ..Book::default()
        };
        repo.create(book).expect("seeding never fails");
    }
    repo
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // One capability shared by every session; revoked until "login".
    let capability = EditCapability::denied();

    // Authors: start empty, create through the form.
    let author_descriptor = author_descriptor()?;
    let mut authors = Projection::new(author_descriptor.clone());
    let mut author_session = FormSession::new(
        author_descriptor,
        MemoryRepository::<Author>::new(),
        capability.clone(),
    );

    // Books: seeded.
    let book_descriptor = book_descriptor()?;
    let mut books = Projection::new(book_descriptor.clone());
    let mut book_session = FormSession::new(book_descriptor, seed_books(), capability.clone());

    book_session.refresh(&mut books)?;
    print_table(&books);

    // Filtering, as typed keystroke by keystroke.
    books.set_filter_text("dun");
    print_table(&books);
    books.set_filter_text("");

    // Mutations are refused while logged out.
    book_session.set_buffer("title", "Neuromancer");
    match book_session.commit(&mut books) {
        Err(CommitError::PermissionDenied) => println!("commit refused: not logged in"),
        other => println!("unexpected: {other:?}"),
    }

    // "Login" grants the shared capability.
    capability.grant();

    // Create a book.
    book_session.set_buffer("title", "Neuromancer");
    book_session.set_buffer("category", "Science Fiction");
    book_session.set_buffer("price", "12.5");
    let created = book_session.commit(&mut books)?;
    println!("created book id={}", created.identity().expect("backend assigns"));

    // Select and update it.
    let selected = books
        .find(created.identity().expect("just created"))
        .cloned()
        .expect("present in backing");
    book_session.select(Some(selected));
    book_session.set_buffer("price", "11.0");
    book_session.commit(&mut books)?;

    // Delete a row.
    let dracula = books.find(EntityId::new(3)).cloned().expect("seeded");
    book_session.select(Some(dracula));
    book_session.delete_selected(&mut books)?;
    print_table(&books);

    // The very same engine drives a different entity type.
    author_session.set_buffer("name", "Frank Herbert");
    author_session.set_buffer("country", "USA");
    author_session.commit(&mut authors)?;
    author_session.set_buffer("name", "Mary Shelley");
    author_session.set_buffer("country", "UK");
    author_session.commit(&mut authors)?;

    authors.sort_by_field("name", true);
    print_table(&authors);

    Ok(())
}
