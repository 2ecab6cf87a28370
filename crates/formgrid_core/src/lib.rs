//! # FormGrid Core
//!
//! A generic, metadata-driven CRUD and search engine. One generic
//! implementation, instantiated per entity type, manages unrelated record
//! types without per-type code.
//!
//! Given only an [`EntityDescriptor`] for a record type, the engine provides:
//!
//! - a column/field projection for display ([`Projection`]),
//! - a string-based field codec ([`codec`]) for editable inputs,
//! - a free-text substring filter across all fields ([`filter`]),
//! - a create/update/delete orchestrator ([`FormSession`]) that keeps an
//!   in-memory collection, a persisted store, and a displayed projection
//!   consistent.
//!
//! Persistence is abstracted behind the four-method [`Repository`] contract;
//! mutation rights are a single boolean capability supplied by the
//! surrounding shell ([`EditCapability`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use formgrid_core::{EntityDescriptor, FieldDescriptor, FieldKind, FormSession, Projection};
//!
//! let descriptor = EntityDescriptor::describe("book", vec![
//!     FieldDescriptor::identity("book_id", FieldKind::Integer),
//!     FieldDescriptor::new("title", FieldKind::Text),
//!     FieldDescriptor::new("price", FieldKind::Real),
//! ])?;
//!
//! let mut projection = Projection::new(descriptor.clone());
//! let mut session = FormSession::new(descriptor, repository, capability);
//!
//! session.refresh(&mut projection)?;
//! projection.set_filter_text("dun");
//! for row in projection.display_rows() {
//!     println!("{row:?}");
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod descriptor;
pub mod entity;
pub mod error;
pub mod filter;
pub mod projection;
pub mod repository;
pub mod session;
pub mod types;
pub mod value;

pub use descriptor::{EntityDescriptor, FieldDescriptor};
pub use entity::Entity;
pub use error::{CommitError, DescriptorError, ParseError, RepositoryError, StorageError};
pub use filter::Query;
pub use projection::{Projection, ProjectionEvent};
pub use repository::{EditCapability, GatedRepository, Repository};
pub use session::{FormField, FormSession, Mode};
pub use types::EntityId;
pub use value::{FieldKind, FieldValue};
