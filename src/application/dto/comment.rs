use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::Comment;
use crate::domain::value_objects::{CommentId, TodoId};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub id: CommentId,
    pub content: String,
    pub todo_item_id: TodoId,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Comment> for CommentDto {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id(),
            content: comment.content().value().to_string(),
            todo_item_id: comment.todo_item_id(),
            created_at: comment.created_at(),
            updated_at: comment.updated_at(),
        }
    }
}
