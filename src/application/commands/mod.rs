//! Commands - Requests that change state
//!
//! Field-level rules are declared with `validator` derives and enforced by the
//! validation behavior before a handler runs.

mod comment_commands;
mod project_commands;
mod rules;
mod todo_commands;

pub use comment_commands::{CreateCommentCommand, DeleteCommentCommand, UpdateCommentCommand};
pub use project_commands::{CreateProjectCommand, DeleteProjectCommand, UpdateProjectCommand};
pub use todo_commands::{CreateTodoCommand, DeleteTodoCommand, UpdateTodoCommand};
