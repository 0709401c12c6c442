use serde::Deserialize;
use validator::Validate;

use super::rules::not_blank;
use crate::application::dto::CommentDto;
use crate::application::pipeline::request;
use crate::domain::value_objects::{CommentId, TodoId};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentCommand {
    #[validate(
        length(min = 1, max = 500, message = "Comment content must be between 1 and 500 characters"),
        custom(function = "not_blank", message = "Comment content is required")
    )]
    pub content: String,
    pub todo_item_id: TodoId,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCommentCommand {
    pub id: CommentId,
    #[validate(
        length(min = 1, max = 500, message = "Comment content must be between 1 and 500 characters"),
        custom(function = "not_blank", message = "Comment content is required")
    )]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteCommentCommand {
    pub id: CommentId,
}

request!(CreateCommentCommand => CommentDto);
request!(UpdateCommentCommand => CommentDto);
request!(DeleteCommentCommand => bool);
