//! The entity accessor contract.

use crate::types::EntityId;
use crate::value::FieldValue;

/// A record type managed by the generic engine.
///
/// Implementations pair a concrete record type with the accessor functions
/// its [`EntityDescriptor`](crate::EntityDescriptor) promises: reading and
/// writing fields by name, and carrying an optional backend-assigned
/// identity. This is the compiled replacement for the reflection the engine
/// would otherwise need.
///
/// Contract, relative to the type's descriptor:
/// - `field` returns [`FieldValue::Absent`] for unknown names and for unset
///   optional fields;
/// - `set_field` ignores unknown names and best-effort coerces nothing: the
///   caller supplies a value of the field's declared kind;
/// - `identity`/`assign_identity` address the single identity field. A
///   freshly constructed (`Default`) instance has no identity.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone, Default)]
/// struct Author {
///     id: Option<EntityId>,
///     name: String,
/// }
///
/// impl Entity for Author {
///     fn field(&self, name: &str) -> FieldValue {
///         match name {
///             "author_id" => self.id.map_or(FieldValue::Absent, |id| id.as_i64().into()),
///             "name" => self.name.as_str().into(),
///             _ => FieldValue::Absent,
///         }
///     }
///
///     fn set_field(&mut self, name: &str, value: FieldValue) {
///         if name == "name" {
///             self.name = value.as_text().unwrap_or_default().to_string();
///         }
///     }
///
///     fn identity(&self) -> Option<EntityId> {
///         self.id
///     }
///
///     fn assign_identity(&mut self, id: EntityId) {
///         self.id = Some(id);
///     }
/// }
/// ```
pub trait Entity: Clone + Default {
    /// Returns the value of the named field.
    fn field(&self, name: &str) -> FieldValue;

    /// Sets the value of the named field.
    fn set_field(&mut self, name: &str, value: FieldValue);

    /// Returns the backend-assigned identity, if any.
    fn identity(&self) -> Option<EntityId>;

    /// Records the backend-assigned identity.
    fn assign_identity(&mut self, id: EntityId);
}
