//! Error types for the FormGrid core.
//!
//! Every failure is returned to the caller as a typed result; the core never
//! logs-and-swallows. Only [`DescriptorError`] is fatal, and only during
//! initial setup.

use crate::value::FieldKind;
use std::io;
use thiserror::Error;

/// Errors raised while building an entity descriptor.
///
/// Descriptors are built once at startup from static declarations, so these
/// indicate a programming error and should fail fast.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptorError {
    /// Two fields share the same name.
    #[error("duplicate field name: {name}")]
    DuplicateField {
        /// The repeated field name.
        name: String,
    },

    /// More than one field is marked as the identity.
    #[error("more than one identity field: {first} and {second}")]
    MultipleIdentity {
        /// The first field marked as identity.
        first: String,
        /// The second field marked as identity.
        second: String,
    },

    /// No field is marked as the identity.
    #[error("no identity field declared for entity type {type_name}")]
    MissingIdentity {
        /// The entity type missing an identity field.
        type_name: String,
    },
}

/// A typed parse failure for a single field's text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("field {field}: {reason}")]
pub struct ParseError {
    /// Name of the field whose text failed to parse.
    pub field: String,
    /// Human-readable reason.
    pub reason: String,
}

impl ParseError {
    /// Creates a parse error for a field that does not hold the expected kind.
    pub fn new(field: impl Into<String>, expected: FieldKind, input: &str) -> Self {
        Self {
            field: field.into(),
            reason: format!("{input:?} is not a valid {expected} value"),
        }
    }
}

/// Errors raised by a persistence backend.
///
/// A repository either applies an operation fully or returns one of these;
/// partial results are never reported as success.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached.
    #[error("backend unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },

    /// The backend refused the operation.
    #[error("backend rejected operation: {message}")]
    Rejected {
        /// Description of the refusal.
        message: String,
    },

    /// An I/O error occurred in the transport.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl StorageError {
    /// Creates an unavailable-backend error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a rejected-operation error.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

/// Errors raised by a capability-gated repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The caller's edit capability is not granted.
    #[error("permission denied: edit capability not granted")]
    PermissionDenied,

    /// The backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors raised by a form session commit or delete.
#[derive(Debug, Error)]
pub enum CommitError {
    /// The caller's edit capability is not granted.
    #[error("permission denied: edit capability not granted")]
    PermissionDenied,

    /// A field buffer failed to parse; nothing was committed.
    #[error("validation failed: {0}")]
    Validation(#[from] ParseError),

    /// No row with the selected identity exists in the store.
    #[error("no row matches the selected identity")]
    NotFound,

    /// The operation requires a selection and the session is in create mode.
    #[error("no instance is selected")]
    NoSelection,

    /// The backend failed; the projection backing was left unchanged.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<RepositoryError> for CommitError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::PermissionDenied => CommitError::PermissionDenied,
            RepositoryError::Storage(e) => CommitError::Storage(e),
        }
    }
}
