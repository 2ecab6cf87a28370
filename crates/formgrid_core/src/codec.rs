//! Conversion between typed field values and their editable text form.
//!
//! Formatting is total: every value renders, numbers via locale-independent
//! decimal notation, `Absent` as the empty string. Parsing is typed and
//! reports failures per field; empty text parses to `Absent` (required-ness
//! is a caller-supplied constraint, not part of the minimal field model).

use crate::descriptor::FieldDescriptor;
use crate::error::ParseError;
use crate::value::{FieldKind, FieldValue};

/// Formats a field value as editable/displayable text.
///
/// Never fails. Reals render in Rust's shortest round-trip decimal form, so
/// `parse(format(v))` restores `v` exactly.
#[must_use]
pub fn format(value: &FieldValue) -> String {
    match value {
        FieldValue::Absent => String::new(),
        FieldValue::Integer(v) => v.to_string(),
        FieldValue::Real(v) => v.to_string(),
        FieldValue::Text(s) => s.clone(),
    }
}

/// Parses editable text into a value of the field's declared kind.
///
/// Empty text parses to [`FieldValue::Absent`]. Integer fields require a
/// base-10 `i64`; real fields require a finite decimal (`inf` and `NaN` are
/// rejected); text passes through unchanged.
pub fn parse(field: &FieldDescriptor, text: &str) -> Result<FieldValue, ParseError> {
    if text.is_empty() {
        return Ok(FieldValue::Absent);
    }

    match field.kind() {
        FieldKind::Integer => text
            .parse::<i64>()
            .map(FieldValue::Integer)
            .map_err(|_| ParseError::new(field.name(), FieldKind::Integer, text)),
        FieldKind::Real => match text.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(FieldValue::Real(v)),
            _ => Err(ParseError::new(field.name(), FieldKind::Real, text)),
        },
        FieldKind::Text => Ok(FieldValue::Text(text.to_string())),
    }
}
