use serde::Deserialize;
use validator::Validate;

use super::rules::{not_blank, optional_title, user_id_format};
use crate::application::dto::TodoItemDto;
use crate::application::pipeline::request;
use crate::domain::value_objects::{ProjectId, TodoId};

/// Create a todo item inside an existing project
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTodoCommand {
    #[validate(
        length(min = 3, max = 200, message = "Title must be between 3 and 200 characters"),
        custom(function = "not_blank", message = "Title is required")
    )]
    pub title: String,
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: Option<String>,
    pub project_id: ProjectId,
    #[validate(custom(function = "user_id_format"))]
    pub user_id: String,
}

/// Partially update a todo item
///
/// Absent fields are left alone. A blank title is ignored; an empty description
/// clears the current one.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTodoCommand {
    pub id: TodoId,
    #[validate(custom(function = "optional_title"))]
    pub title: Option<String>,
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: Option<String>,
    pub is_completed: Option<bool>,
    pub project_id: Option<ProjectId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteTodoCommand {
    pub id: TodoId,
}

request!(CreateTodoCommand => TodoItemDto);
request!(UpdateTodoCommand => TodoItemDto);
request!(DeleteTodoCommand => bool);
