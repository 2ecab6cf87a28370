//! Static entity metadata.
//!
//! An [`EntityDescriptor`] is built once per entity type from a static
//! declaration and shared read-only by every consumer. It replaces runtime
//! field reflection: the field list and field types are part of the
//! compiled contract.

use crate::error::DescriptorError;
use crate::value::FieldKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Metadata for a single field of an entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    name: String,
    kind: FieldKind,
    identity: bool,
    visible: bool,
    editable: bool,
}

impl FieldDescriptor {
    /// Declares a regular field: visible, editable, not the identity.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            identity: false,
            visible: true,
            editable: true,
        }
    }

    /// Declares the identity field: visible, never editable.
    ///
    /// The identity field is excluded from form generation and used for
    /// update/delete targeting.
    pub fn identity(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            identity: true,
            visible: true,
            editable: false,
        }
    }

    /// Excludes this field from column display.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Marks this field as not editable in forms.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.editable = false;
        self
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the field kind.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns `true` if this is the identity field.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.identity
    }

    /// Returns `true` if this field is shown as a column.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Returns `true` if this field is editable in forms.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.editable
    }
}

/// Static metadata for one entity type: an ordered field list.
///
/// Immutable once built. Constructed once per entity type via
/// [`EntityDescriptor::describe`] and shared as `Arc<EntityDescriptor>`.
/// Deserialization runs the same validation as `describe`, so a descriptor
/// arriving over a tooling/wire boundary cannot bypass the invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEntityDescriptor")]
pub struct EntityDescriptor {
    type_name: String,
    fields: Vec<FieldDescriptor>,
    identity_index: usize,
}

/// Unvalidated wire form of [`EntityDescriptor`].
///
/// `identity_index` is derived, never trusted from input.
#[derive(Deserialize)]
struct RawEntityDescriptor {
    type_name: String,
    fields: Vec<FieldDescriptor>,
}

impl TryFrom<RawEntityDescriptor> for EntityDescriptor {
    type Error = DescriptorError;

    fn try_from(raw: RawEntityDescriptor) -> Result<Self, DescriptorError> {
        Self::validate(raw.type_name, raw.fields)
    }
}

impl EntityDescriptor {
    /// Builds a descriptor from an ordered field declaration.
    ///
    /// Fails fast when the declaration is malformed: duplicate field names,
    /// more than one identity field, or no identity field at all.
    pub fn describe(
        type_name: impl Into<String>,
        fields: Vec<FieldDescriptor>,
    ) -> Result<Arc<Self>, DescriptorError> {
        Self::validate(type_name.into(), fields).map(Arc::new)
    }

    fn validate(
        type_name: String,
        fields: Vec<FieldDescriptor>,
    ) -> Result<Self, DescriptorError> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name().to_string()) {
                return Err(DescriptorError::DuplicateField {
                    name: field.name().to_string(),
                });
            }
        }

        let mut identity_index = None;
        for (index, field) in fields.iter().enumerate() {
            if !field.is_identity() {
                continue;
            }
            match identity_index {
                None => identity_index = Some(index),
                Some(first) => {
                    return Err(DescriptorError::MultipleIdentity {
                        first: fields[first].name().to_string(),
                        second: field.name().to_string(),
                    });
                }
            }
        }

        let identity_index =
            identity_index.ok_or_else(|| DescriptorError::MissingIdentity {
                type_name: type_name.clone(),
            })?;

        Ok(Self {
            type_name,
            fields,
            identity_index,
        })
    }

    /// Returns the entity type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns all fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Returns the identity field.
    #[must_use]
    pub fn identity_field(&self) -> &FieldDescriptor {
        &self.fields[self.identity_index]
    }

    /// Returns the fields shown as columns, in declaration order.
    pub fn visible_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.is_visible())
    }

    /// Returns the fields that participate in form editing: every
    /// non-identity field, in declaration order.
    pub fn form_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| !f.is_identity())
    }
}
