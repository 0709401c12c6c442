//! UserId value object - The owning user, identified by email address

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::validation::{FieldError, CODE_MALFORMED};

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});

/// An email-shaped user identifier, normalized to lower case
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn create(user_id: &str) -> Result<Self, FieldError> {
        if user_id.trim().is_empty() {
            return Err(FieldError::empty("user_id", "User ID"));
        }
        if !EMAIL_SHAPE.is_match(user_id) {
            return Err(FieldError::new(
                "user_id",
                "Invalid user ID format (must be valid email)",
                CODE_MALFORMED,
            ));
        }
        Ok(Self(user_id.to_lowercase()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
