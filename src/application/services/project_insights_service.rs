//! Project Insights Service - Cross-entity questions about projects
//!
//! Answers the questions no single aggregate can: whether a user already owns
//! a project with a given name, and how far along a project is.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::application::commands::CreateProjectCommand;
use crate::application::dto::ProjectStatsDto;
use crate::application::error::AppResult;
use crate::application::pipeline::Validator;
use crate::application::ports::outbound::UnitOfWorkFactory;
use crate::domain::entities::{Project, TodoItem};
use crate::domain::value_objects::{FieldError, ProjectId};

pub struct ProjectInsightsService {
    store: Arc<dyn UnitOfWorkFactory>,
}

impl ProjectInsightsService {
    pub fn new(store: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { store }
    }

    /// Whether `user_id` has no other project called `name`, ignoring case and
    /// surrounding whitespace
    #[instrument(skip(self))]
    pub async fn is_name_unique(
        &self,
        name: &str,
        user_id: &str,
        excluding: Option<ProjectId>,
    ) -> AppResult<bool> {
        let name = name.trim().to_lowercase();
        let user_id = user_id.trim().to_lowercase();

        let uow = self.store.begin();
        let clashes = uow
            .projects()
            .find(&|p: &Project| {
                Some(p.id()) != excluding
                    && p.user_id().value() == user_id
                    && p.name().value().to_lowercase() == name
            })
            .await?;

        Ok(clashes.is_empty())
    }

    /// Completion summary, or `None` for an unknown project
    #[instrument(skip(self))]
    pub async fn stats(&self, project_id: ProjectId) -> AppResult<Option<ProjectStatsDto>> {
        let uow = self.store.begin();
        if !uow.projects().exists(project_id).await? {
            debug!(project_id = %project_id, "Project not found");
            return Ok(None);
        }

        let todos = uow
            .todos()
            .find(&|t: &TodoItem| t.project_id() == project_id)
            .await?;
        let todo_count = todos.len();
        let completed_count = todos.iter().filter(|t| t.is_completed()).count();
        let completion_percentage = if todo_count == 0 {
            0.0
        } else {
            completed_count as f64 * 100.0 / todo_count as f64
        };

        Ok(Some(ProjectStatsDto {
            project_id,
            todo_count,
            completed_count,
            completion_percentage,
        }))
    }
}

pub const DUPLICATE_NAME_MESSAGE: &str = "A project with this name already exists";

/// Rejects a new project whose name the user already uses
pub struct ProjectNameUniqueRule {
    insights: Arc<ProjectInsightsService>,
}

impl ProjectNameUniqueRule {
    pub fn new(insights: Arc<ProjectInsightsService>) -> Self {
        Self { insights }
    }
}

#[async_trait]
impl Validator for ProjectNameUniqueRule {
    type Request = CreateProjectCommand;

    async fn validate(&self, request: &CreateProjectCommand) -> AppResult<Vec<FieldError>> {
        // Blank names and malformed users are reported by the field rules
        if request.name.trim().is_empty() || request.user_id.trim().is_empty() {
            return Ok(Vec::new());
        }

        let unique = self
            .insights
            .is_name_unique(&request.name, &request.user_id, None)
            .await?;

        Ok(if unique {
            Vec::new()
        } else {
            vec![FieldError::new("name", DUPLICATE_NAME_MESSAGE, "duplicate")]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::SpyStore;
    use crate::domain::entities::Entity;
    use crate::domain::value_objects::{Name, Title, UserId};

    fn project(name: &str, user: &str) -> Project {
        Project::new(
            Name::create(name).unwrap(),
            UserId::create(user).unwrap(),
            None,
        )
    }

    fn todo(project_id: ProjectId, completed: bool) -> TodoItem {
        let mut todo = TodoItem::new(
            Title::create("Write spec").unwrap(),
            project_id,
            UserId::create("a@b.com").unwrap(),
            None,
        );
        if completed {
            todo.mark_as_completed();
        }
        todo.detached()
    }

    #[tokio::test]
    async fn names_are_unique_per_user_ignoring_case() {
        let launch = project("Launch", "a@b.com");
        let store = SpyStore::with_projects(vec![launch.clone(), project("Other", "c@d.com")]);
        let insights = ProjectInsightsService::new(store);

        assert!(!insights.is_name_unique(" LAUNCH ", "A@B.com", None).await.unwrap());
        assert!(insights.is_name_unique("Launch", "c@d.com", None).await.unwrap());
        assert!(insights
            .is_name_unique("Launch", "a@b.com", Some(launch.id()))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn stats_count_completed_items() {
        let launch = project("Launch", "a@b.com");
        let store = SpyStore::with_projects(vec![launch.clone()]).and_todos(vec![
            todo(launch.id(), true),
            todo(launch.id(), false),
            todo(launch.id(), false),
            todo(launch.id(), true),
            todo(ProjectId::new(), true),
        ]);
        let insights = ProjectInsightsService::new(store);

        let stats = insights.stats(launch.id()).await.unwrap().unwrap();
        assert_eq!(stats.todo_count, 4);
        assert_eq!(stats.completed_count, 2);
        assert_eq!(stats.completion_percentage, 50.0);

        assert!(insights.stats(ProjectId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_names_fail_the_rule() {
        let store = SpyStore::with_projects(vec![project("Launch", "a@b.com")]);
        let rule = ProjectNameUniqueRule::new(Arc::new(ProjectInsightsService::new(store)));

        let duplicate = CreateProjectCommand {
            name: "launch".into(),
            description: None,
            user_id: "a@b.com".into(),
        };
        let failures = rule.validate(&duplicate).await.unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, "name");
        assert_eq!(failures[0].code, "duplicate");
    }
}
