//! Domain entities - Core business objects with identity

mod comment;
mod project;
mod todo_item;

use std::fmt;
use std::hash::Hash;

use serde::Serialize;

use crate::domain::events::DomainEvent;
use crate::domain::value_objects::{CommentId, ProjectId, TodoId};

pub use comment::Comment;
pub use project::Project;
pub use todo_item::TodoItem;

/// The kinds of aggregate the tracker stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Todo,
    Project,
    Comment,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Todo => write!(f, "Todo item"),
            EntityKind::Project => write!(f, "Project"),
            EntityKind::Comment => write!(f, "Comment"),
        }
    }
}

/// Behavior shared by every stored entity
pub trait Entity: Clone + fmt::Debug + Send + Sync + 'static {
    type Id: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static;

    const KIND: EntityKind;

    fn id(&self) -> Self::Id;

    /// The copy a store keeps: no pending events and no loaded child collections
    fn detached(&self) -> Self;

    /// Drain the events recorded since the last call
    fn take_domain_events(&mut self) -> Vec<DomainEvent> {
        Vec::new()
    }
}

/// Violations of aggregate invariants
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("Comment {comment_id} belongs to todo item {owner} and cannot be attached to {target}")]
    CommentBelongsToAnotherTodo {
        comment_id: CommentId,
        owner: TodoId,
        target: TodoId,
    },

    #[error("Todo item {todo_id} belongs to project {owner} and cannot be attached to {target}")]
    TodoBelongsToAnotherProject {
        todo_id: TodoId,
        owner: ProjectId,
        target: ProjectId,
    },
}
