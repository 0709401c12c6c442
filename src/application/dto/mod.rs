//! Data Transfer Objects - What handlers return to callers
//!
//! DTOs are plain serializable projections of the domain entities. Mapping is
//! done with `From<&Entity>` impls and has no side effects.

mod comment;
mod project;
mod todo;

pub use comment::CommentDto;
pub use project::{ProjectDto, ProjectStatsDto};
pub use todo::TodoItemDto;
