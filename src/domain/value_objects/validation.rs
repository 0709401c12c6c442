//! Validation failures - Field-level rule violations shared by value objects and
//! request validators

use serde::Serialize;

/// Machine-readable code for value-object rule violations
pub const CODE_EMPTY: &str = "empty";
pub const CODE_TOO_LONG: &str = "too_long";
pub const CODE_MALFORMED: &str = "malformed";

/// A single rule violation on a named field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub code: String,
}

impl FieldError {
    pub fn new(
        field: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: code.into(),
        }
    }

    pub(crate) fn empty(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} cannot be empty", label), CODE_EMPTY)
    }

    pub(crate) fn too_long(field: &str, label: &str, max: usize) -> Self {
        Self::new(
            field,
            format!("{} cannot exceed {} characters", label, max),
            CODE_TOO_LONG,
        )
    }
}

/// One or more field errors raised together
///
/// Produced by value-object factories (always a single entry) and by the
/// validation behavior (every failure found for a request).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("validation failed: {}", summary(.errors))]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Whether any error names the given field
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl From<FieldError> for ValidationError {
    fn from(error: FieldError) -> Self {
        Self::new(vec![error])
    }
}

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Length in characters, as users count them
pub(crate) fn char_len(value: &str) -> usize {
    value.chars().count()
}
