//! Content value object - The body of a comment

use std::fmt;

use serde::Serialize;

use super::validation::{char_len, FieldError};

/// Comment text: never blank, stored trimmed, at most 500 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Content(String);

impl Content {
    pub const MAX_LENGTH: usize = 500;

    pub fn create(content: &str) -> Result<Self, FieldError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(FieldError::empty("content", "Content"));
        }
        if char_len(trimmed) > Self::MAX_LENGTH {
            return Err(FieldError::too_long("content", "Content", Self::MAX_LENGTH));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_trimmed_content() {
        assert_eq!(Content::create(" Looks good ").unwrap().value(), "Looks good");
        assert!(Content::create(&"c".repeat(500)).is_ok());
    }

    #[test]
    fn rejects_blank_and_overlong_content() {
        assert!(Content::create("").is_err());
        assert!(Content::create(" \t ").is_err());
        let err = Content::create(&"c".repeat(501)).unwrap_err();
        assert_eq!(err.field, "content");
    }
}
