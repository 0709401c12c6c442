//! Title value object - The headline of a todo item

use std::fmt;

use serde::Serialize;

use super::validation::{char_len, FieldError};

/// A todo title: never blank, stored trimmed, at most 200 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Title(String);

impl Title {
    pub const MAX_LENGTH: usize = 200;

    pub fn create(title: &str) -> Result<Self, FieldError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(FieldError::empty("title", "Title"));
        }
        if char_len(trimmed) > Self::MAX_LENGTH {
            return Err(FieldError::too_long("title", "Title", Self::MAX_LENGTH));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
