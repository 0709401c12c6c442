use serde::Deserialize;
use validator::Validate;

use super::rules::{optional_project_name, project_name_allowed, user_id_format};
use crate::application::dto::ProjectDto;
use crate::application::pipeline::request;
use crate::domain::value_objects::ProjectId;

/// Create a project for a user
///
/// Name uniqueness per user is checked separately by `ProjectNameUniqueRule`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProjectCommand {
    #[validate(
        length(min = 1, max = 100, message = "Project name must be between 1 and 100 characters"),
        custom(function = "project_name_allowed")
    )]
    pub name: String,
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: Option<String>,
    #[validate(custom(function = "user_id_format"))]
    pub user_id: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProjectCommand {
    pub id: ProjectId,
    #[validate(custom(function = "optional_project_name"))]
    pub name: Option<String>,
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: Option<String>,
}

/// Delete a project together with its todo items and their comments
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteProjectCommand {
    pub id: ProjectId,
}

request!(CreateProjectCommand => ProjectDto);
request!(UpdateProjectCommand => ProjectDto);
request!(DeleteProjectCommand => bool);

#[cfg(test)]
mod tests {
    use super::*;

    fn create(name: &str) -> CreateProjectCommand {
        CreateProjectCommand {
            name: name.to_string(),
            description: None,
            user_id: "a@b.com".to_string(),
        }
    }

    #[test]
    fn create_rejects_reserved_short_and_long_names() {
        assert!(create("Launch").validate().is_ok());

        for name in ["admin", "ab", "", &"x".repeat(101)] {
            let errors = create(name).validate().unwrap_err();
            assert!(errors.field_errors().contains_key("name"), "{name:?}");
        }
    }

    #[test]
    fn update_skips_absent_name() {
        let update = UpdateProjectCommand {
            name: Some("  ".into()),
            ..Default::default()
        };
        assert!(update.validate().is_ok());

        let update = UpdateProjectCommand {
            name: Some("system".into()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
