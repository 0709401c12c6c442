//! Description value object - Optional free text on todos and projects

use std::fmt;

use serde::Serialize;

use super::validation::{char_len, FieldError};

/// Free-form description, at most 1000 characters
///
/// Unlike the other text value objects a description may be empty; empty input
/// yields an empty description rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Description(String);

impl Description {
    pub const MAX_LENGTH: usize = 1000;

    pub fn create(description: &str) -> Result<Self, FieldError> {
        if char_len(description) > Self::MAX_LENGTH {
            return Err(FieldError::too_long(
                "description",
                "Description",
                Self::MAX_LENGTH,
            ));
        }
        Ok(Self(description.trim().to_string()))
    }

    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
