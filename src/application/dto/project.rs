use chrono::{DateTime, Utc};
use serde::Serialize;

use super::TodoItemDto;
use crate::domain::entities::Project;
use crate::domain::value_objects::ProjectId;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDto {
    pub id: ProjectId,
    pub name: String,
    pub description: Option<String>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Empty unless the todo items were loaded
    pub todo_items: Vec<TodoItemDto>,
}

impl From<&Project> for ProjectDto {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id(),
            name: project.name().value().to_string(),
            description: project.description().map(|d| d.value().to_string()),
            user_id: project.user_id().value().to_string(),
            created_at: project.created_at(),
            updated_at: project.updated_at(),
            todo_items: project.todo_items().iter().map(TodoItemDto::from).collect(),
        }
    }
}

/// Progress summary for one project
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStatsDto {
    pub project_id: ProjectId,
    pub todo_count: usize,
    pub completed_count: usize,
    /// 0.0 when the project has no todo items
    pub completion_percentage: f64,
}
