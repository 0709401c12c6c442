//! Custom field rules used by the `#[validate(custom(..))]` attributes on commands

use std::borrow::Cow;

use validator::ValidationError;

use crate::domain::value_objects::UserId;

/// Project names that cannot be used
const RESERVED_PROJECT_NAMES: [&str; 4] = ["admin", "system", "root", "default"];

const MIN_TITLE_LENGTH: usize = 3;
const MAX_TITLE_LENGTH: usize = 200;
const MIN_PROJECT_NAME_LENGTH: usize = 3;
const MAX_PROJECT_NAME_LENGTH: usize = 100;

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Email-shaped user id, the same shape `UserId` accepts
pub(crate) fn user_id_format(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(rule_error("required", "User ID is required"));
    }
    UserId::create(value)
        .map(|_| ())
        .map_err(|_| rule_error("email", "User ID must be a valid email address"))
}

/// Title length, checked only when a title was actually supplied
pub(crate) fn optional_title(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    let length = value.chars().count();
    if length < MIN_TITLE_LENGTH {
        return Err(rule_error("length", "Title must be at least 3 characters"));
    }
    if length > MAX_TITLE_LENGTH {
        return Err(rule_error("length", "Title cannot exceed 200 characters"));
    }
    Ok(())
}

pub(crate) fn project_name_allowed(value: &str) -> Result<(), ValidationError> {
    let name = value.trim();
    if name.is_empty() {
        return Err(rule_error("required", "Project name is required"));
    }
    let reserved = RESERVED_PROJECT_NAMES
        .iter()
        .any(|r| name.eq_ignore_ascii_case(r));
    if name.chars().count() < MIN_PROJECT_NAME_LENGTH || reserved {
        return Err(rule_error(
            "reserved_or_short",
            "Project name contains reserved words or is too short",
        ));
    }
    Ok(())
}

/// Project name rules, checked only when a name was actually supplied
pub(crate) fn optional_project_name(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    if value.chars().count() > MAX_PROJECT_NAME_LENGTH {
        return Err(rule_error(
            "length",
            "Project name cannot exceed 100 characters",
        ));
    }
    project_name_allowed(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_and_short_project_names_are_rejected() {
        assert!(project_name_allowed("Launch").is_ok());
        assert!(project_name_allowed("  Launch  ").is_ok());

        for name in ["admin", "ROOT", " System ", "ab", "  a  "] {
            let err = project_name_allowed(name).unwrap_err();
            assert_eq!(err.code, "reserved_or_short", "{name:?}");
        }
        assert_eq!(project_name_allowed("   ").unwrap_err().code, "required");
    }

    #[test]
    fn optional_rules_skip_absent_values() {
        assert!(optional_title("").is_ok());
        assert!(optional_title("ab").is_err());
        assert!(optional_title(&"x".repeat(201)).is_err());
        assert!(optional_project_name("  ").is_ok());
        assert!(optional_project_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn user_ids_must_be_email_shaped() {
        assert!(user_id_format("a@b.com").is_ok());
        assert_eq!(user_id_format("").unwrap_err().code, "required");
        assert_eq!(user_id_format("alice").unwrap_err().code, "email");
    }
}
