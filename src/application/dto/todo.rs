use chrono::{DateTime, Utc};
use serde::Serialize;

use super::CommentDto;
use crate::domain::entities::TodoItem;
use crate::domain::value_objects::{ProjectId, TodoId};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItemDto {
    pub id: TodoId,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub project_id: ProjectId,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Empty unless the comments were loaded
    pub comments: Vec<CommentDto>,
}

impl From<&TodoItem> for TodoItemDto {
    fn from(todo: &TodoItem) -> Self {
        Self {
            id: todo.id(),
            title: todo.title().value().to_string(),
            description: todo.description().map(|d| d.value().to_string()),
            is_completed: todo.is_completed(),
            project_id: todo.project_id(),
            user_id: todo.user_id().value().to_string(),
            created_at: todo.created_at(),
            updated_at: todo.updated_at(),
            comments: todo.comments().iter().map(CommentDto::from).collect(),
        }
    }
}
