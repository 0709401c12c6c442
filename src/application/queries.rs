//! Queries - Read-only requests

use serde::Deserialize;

use crate::application::dto::{CommentDto, ProjectDto, ProjectStatsDto, TodoItemDto};
use crate::application::pipeline::request;
use crate::domain::value_objects::{CommentId, ProjectId, TodoId};

// =============================================================================
// Todo items
// =============================================================================

/// Every todo item, oldest first, with comments loaded
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetAllTodosQuery;

#[derive(Debug, Clone, Deserialize)]
pub struct GetTodoByIdQuery {
    pub id: TodoId,
}

request!(GetAllTodosQuery => Vec<TodoItemDto>);
request!(GetTodoByIdQuery => Option<TodoItemDto>);

// =============================================================================
// Projects
// =============================================================================

/// Every project, oldest first, with todo items loaded
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetAllProjectsQuery;

#[derive(Debug, Clone, Deserialize)]
pub struct GetProjectByIdQuery {
    pub id: ProjectId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetProjectStatsQuery {
    pub id: ProjectId,
}

request!(GetAllProjectsQuery => Vec<ProjectDto>);
request!(GetProjectByIdQuery => Option<ProjectDto>);
request!(GetProjectStatsQuery => Option<ProjectStatsDto>);

// =============================================================================
// Comments
// =============================================================================

/// Comments on one todo item, oldest first
#[derive(Debug, Clone, Deserialize)]
pub struct GetCommentsForTodoQuery {
    pub todo_item_id: TodoId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetCommentByIdQuery {
    pub id: CommentId,
}

request!(GetCommentsForTodoQuery => Vec<CommentDto>);
request!(GetCommentByIdQuery => Option<CommentDto>);
