//! Dynamic field values and their kinds.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// The semantic type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    /// Signed 64-bit integer.
    Integer,
    /// Finite 64-bit floating point number.
    Real,
    /// UTF-8 text.
    Text,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Integer => write!(f, "integer"),
            FieldKind::Real => write!(f, "real"),
            FieldKind::Text => write!(f, "text"),
        }
    }
}

/// A dynamic field value.
///
/// This is the type-erased currency between an entity instance and the
/// generic engine: descriptors name fields, instances hand out `FieldValue`s
/// for them. `Absent` models null/unset, which formats as the empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Null / unset value.
    Absent,
    /// Signed integer value.
    Integer(i64),
    /// Floating point value. Always finite.
    Real(f64),
    /// Text value.
    Text(String),
}

impl FieldValue {
    /// Returns the kind of this value, or `None` for `Absent`.
    #[must_use]
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            FieldValue::Absent => None,
            FieldValue::Integer(_) => Some(FieldKind::Integer),
            FieldValue::Real(_) => Some(FieldKind::Real),
            FieldValue::Text(_) => Some(FieldKind::Text),
        }
    }

    /// Returns `true` for `Absent`.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    /// Returns the integer value, if this is an integer.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the real value, if this is a real.
    #[must_use]
    pub fn as_real(&self) -> Option<f64> {
        match self {
            FieldValue::Real(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text value, if this is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Total ordering across values, used for re-ordering a projection by
    /// one of its columns.
    ///
    /// `Absent` sorts first; mixed kinds order by kind rank; reals compare
    /// with `f64::total_cmp`.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FieldValue::Absent, FieldValue::Absent) => Ordering::Equal,
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a.cmp(b),
            (FieldValue::Real(a), FieldValue::Real(b)) => a.total_cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            FieldValue::Absent => 0,
            FieldValue::Integer(_) => 1,
            FieldValue::Real(_) => 2,
            FieldValue::Text(_) => 3,
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Real(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}
