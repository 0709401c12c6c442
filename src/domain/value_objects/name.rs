//! Name value object - The display name of a project

use std::fmt;

use serde::Serialize;

use super::validation::{char_len, FieldError};

/// A project name: never blank, at most 100 characters, stored trimmed
///
/// The length limit applies to the input as given, before trimming.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Name(String);

impl Name {
    pub const MAX_LENGTH: usize = 100;

    pub fn create(name: &str) -> Result<Self, FieldError> {
        if name.trim().is_empty() {
            return Err(FieldError::empty("name", "Name"));
        }
        if char_len(name) > Self::MAX_LENGTH {
            return Err(FieldError::too_long("name", "Name", Self::MAX_LENGTH));
        }
        Ok(Self(name.trim().to_string()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_and_trims_valid_names() {
        assert_eq!(Name::create(" Launch ").unwrap().value(), "Launch");
        assert!(Name::create(&"n".repeat(100)).is_ok());
    }

    #[test]
    fn rejects_blank_and_overlong_names() {
        assert_eq!(Name::create("  ").unwrap_err().field, "name");
        assert!(Name::create(&"n".repeat(101)).is_err());
        // padding counts toward the limit
        assert!(Name::create(&format!("{} ", "n".repeat(100))).is_err());
    }
}
