//! Project handlers

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use super::optional_description;
use crate::application::commands::{
    CreateProjectCommand, DeleteProjectCommand, UpdateProjectCommand,
};
use crate::application::dto::{ProjectDto, ProjectStatsDto};
use crate::application::error::{AppError, AppResult};
use crate::application::pipeline::{cancellable, RequestHandler};
use crate::application::ports::outbound::UnitOfWorkFactory;
use crate::application::queries::{GetAllProjectsQuery, GetProjectByIdQuery, GetProjectStatsQuery};
use crate::application::services::{ProjectInsightsService, DUPLICATE_NAME_MESSAGE};
use crate::domain::entities::{EntityKind, Project, TodoItem};
use crate::domain::value_objects::{FieldError, Name, ProjectId, UserId};

// =============================================================================
// Commands
// =============================================================================

pub struct CreateProjectHandler {
    store: Arc<dyn UnitOfWorkFactory>,
}

impl CreateProjectHandler {
    pub fn new(store: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler for CreateProjectHandler {
    type Request = CreateProjectCommand;

    #[instrument(skip_all, fields(name = %request.name))]
    async fn handle(
        &self,
        request: &CreateProjectCommand,
        cancel: &CancellationToken,
    ) -> AppResult<ProjectDto> {
        let name = Name::create(&request.name)?;
        let description = match request.description.as_deref() {
            Some(raw) => optional_description(raw)?,
            None => None,
        };
        let user_id = UserId::create(&request.user_id)?;
        let project = Project::new(name, user_id, description);

        let uow = self.store.begin();
        let stored = cancellable(cancel, uow.projects().add(&project)).await?;
        cancellable(cancel, uow.save_changes()).await?;

        info!(project_id = %stored.id(), "Created project: {}", stored.name());
        Ok(ProjectDto::from(&stored))
    }
}

pub struct UpdateProjectHandler {
    store: Arc<dyn UnitOfWorkFactory>,
    insights: Arc<ProjectInsightsService>,
}

impl UpdateProjectHandler {
    pub fn new(store: Arc<dyn UnitOfWorkFactory>, insights: Arc<ProjectInsightsService>) -> Self {
        Self { store, insights }
    }
}

#[async_trait]
impl RequestHandler for UpdateProjectHandler {
    type Request = UpdateProjectCommand;

    #[instrument(skip_all, fields(project_id = %request.id))]
    async fn handle(
        &self,
        request: &UpdateProjectCommand,
        cancel: &CancellationToken,
    ) -> AppResult<ProjectDto> {
        let uow = self.store.begin();

        let mut project = cancellable(cancel, uow.projects().get_by_id(request.id))
            .await?
            .ok_or_else(|| AppError::not_found(EntityKind::Project, request.id))?;

        if let Some(name) = request.name.as_deref().filter(|n| !n.trim().is_empty()) {
            let name = Name::create(name)?;
            let unique = cancellable(
                cancel,
                self.insights
                    .is_name_unique(name.value(), project.user_id().value(), Some(project.id())),
            )
            .await?;
            if !unique {
                return Err(FieldError::new("name", DUPLICATE_NAME_MESSAGE, "duplicate").into());
            }
            project.update_name(name);
        }
        if let Some(raw) = request.description.as_deref() {
            project.update_description(optional_description(raw)?);
        }

        cancellable(cancel, uow.projects().update(&project)).await?;
        cancellable(cancel, uow.save_changes()).await?;

        info!(project_id = %project.id(), "Updated project: {}", project.name());
        Ok(ProjectDto::from(&project))
    }
}

pub struct DeleteProjectHandler {
    store: Arc<dyn UnitOfWorkFactory>,
}

impl DeleteProjectHandler {
    pub fn new(store: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler for DeleteProjectHandler {
    type Request = DeleteProjectCommand;

    #[instrument(skip_all, fields(project_id = %request.id))]
    async fn handle(
        &self,
        request: &DeleteProjectCommand,
        cancel: &CancellationToken,
    ) -> AppResult<bool> {
        let uow = self.store.begin();

        let Some(project) = cancellable(cancel, uow.projects().get_by_id(request.id)).await? else {
            debug!("Project not found, nothing to delete");
            return Ok(false);
        };

        cancellable(cancel, uow.projects().remove(&project)).await?;
        let affected = cancellable(cancel, uow.save_changes()).await?;

        info!(affected, "Deleted project: {}", project.name());
        Ok(true)
    }
}

// =============================================================================
// Queries
// =============================================================================

pub struct GetAllProjectsHandler {
    store: Arc<dyn UnitOfWorkFactory>,
}

impl GetAllProjectsHandler {
    pub fn new(store: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler for GetAllProjectsHandler {
    type Request = GetAllProjectsQuery;

    #[instrument(skip_all)]
    async fn handle(
        &self,
        _request: &GetAllProjectsQuery,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<ProjectDto>> {
        debug!("Listing all projects");
        let uow = self.store.begin();

        let projects = cancellable(cancel, uow.projects().get_all()).await?;
        let mut todos: HashMap<ProjectId, Vec<TodoItem>> = HashMap::new();
        for todo in cancellable(cancel, uow.todos().get_all()).await? {
            todos.entry(todo.project_id()).or_default().push(todo);
        }

        Ok(projects
            .into_iter()
            .map(|project| {
                let loaded = todos.remove(&project.id()).unwrap_or_default();
                ProjectDto::from(&project.with_todo_items(loaded))
            })
            .collect())
    }
}

pub struct GetProjectByIdHandler {
    store: Arc<dyn UnitOfWorkFactory>,
}

impl GetProjectByIdHandler {
    pub fn new(store: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler for GetProjectByIdHandler {
    type Request = GetProjectByIdQuery;

    #[instrument(skip_all, fields(project_id = %request.id))]
    async fn handle(
        &self,
        request: &GetProjectByIdQuery,
        cancel: &CancellationToken,
    ) -> AppResult<Option<ProjectDto>> {
        debug!("Fetching project");
        let uow = self.store.begin();

        let Some(project) = cancellable(cancel, uow.projects().get_by_id(request.id)).await? else {
            return Ok(None);
        };
        let project_id = project.id();
        let todos = cancellable(
            cancel,
            uow.todos().find(&|t: &TodoItem| t.project_id() == project_id),
        )
        .await?;

        Ok(Some(ProjectDto::from(&project.with_todo_items(todos))))
    }
}

pub struct GetProjectStatsHandler {
    insights: Arc<ProjectInsightsService>,
}

impl GetProjectStatsHandler {
    pub fn new(insights: Arc<ProjectInsightsService>) -> Self {
        Self { insights }
    }
}

#[async_trait]
impl RequestHandler for GetProjectStatsHandler {
    type Request = GetProjectStatsQuery;

    async fn handle(
        &self,
        request: &GetProjectStatsQuery,
        cancel: &CancellationToken,
    ) -> AppResult<Option<ProjectStatsDto>> {
        cancellable(cancel, self.insights.stats(request.id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::SpyStore;

    fn insights(store: Arc<SpyStore>) -> Arc<ProjectInsightsService> {
        Arc::new(ProjectInsightsService::new(store))
    }

    fn command(name: &str, description: Option<&str>) -> CreateProjectCommand {
        CreateProjectCommand {
            name: name.into(),
            description: description.map(Into::into),
            user_id: "A@B.com".into(),
        }
    }

    #[tokio::test]
    async fn create_normalizes_and_saves() {
        let store = SpyStore::new();
        let handler = CreateProjectHandler::new(store.clone());

        let dto = handler
            .handle(&command("  Launch  ", Some("Ship it")), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(dto.name, "Launch");
        assert_eq!(dto.description.as_deref(), Some("Ship it"));
        assert_eq!(dto.user_id, "a@b.com");
        assert_eq!(store.calls(), vec!["projects.add", "save_changes"]);
    }

    #[tokio::test]
    async fn update_missing_project_is_not_found() {
        let store = SpyStore::new();
        let handler = UpdateProjectHandler::new(store.clone(), insights(store));

        let err = handler
            .handle(
                &UpdateProjectCommand {
                    id: ProjectId::new(),
                    ..Default::default()
                },
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::NotFound {
                entity: EntityKind::Project,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn update_keeps_name_when_blank_and_clears_empty_description() {
        let project = Project::new(
            Name::create("Launch").unwrap(),
            UserId::create("a@b.com").unwrap(),
            Some(crate::domain::value_objects::Description::create("v1").unwrap()),
        );
        let store = SpyStore::with_projects(vec![project.clone()]);
        let handler = UpdateProjectHandler::new(store.clone(), insights(store));

        let dto = handler
            .handle(
                &UpdateProjectCommand {
                    id: project.id(),
                    name: Some(" ".into()),
                    description: Some(String::new()),
                },
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(dto.name, "Launch");
        assert!(dto.description.is_none());
        assert!(dto.updated_at.is_some());
    }

    #[tokio::test]
    async fn delete_missing_project_returns_false() {
        let store = SpyStore::new();
        let handler = DeleteProjectHandler::new(store.clone());

        let deleted = handler
            .handle(
                &DeleteProjectCommand { id: ProjectId::new() },
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!(!deleted);
        assert!(!store.called("projects.remove"));
    }

    #[tokio::test]
    async fn rename_to_a_name_the_owner_already_uses_is_rejected() {
        let user = UserId::create("a@b.com").unwrap();
        let launch = Project::new(Name::create("Launch").unwrap(), user.clone(), None);
        let backlog = Project::new(Name::create("Backlog").unwrap(), user, None);
        let store = SpyStore::with_projects(vec![launch, backlog.clone()]);
        let handler = UpdateProjectHandler::new(store.clone(), insights(store.clone()));

        let err = handler
            .handle(
                &UpdateProjectCommand {
                    id: backlog.id(),
                    name: Some("LAUNCH".into()),
                    ..Default::default()
                },
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        match err {
            AppError::Validation(validation) => {
                assert!(validation.has_field("name"));
                assert_eq!(validation.errors()[0].code, "duplicate");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!store.called("projects.update"));
        assert!(!store.called("save_changes"));
    }

    #[tokio::test]
    async fn rename_may_keep_the_current_name_in_another_case() {
        let project = Project::new(
            Name::create("Launch").unwrap(),
            UserId::create("a@b.com").unwrap(),
            None,
        );
        let store = SpyStore::with_projects(vec![project.clone()]);
        let handler = UpdateProjectHandler::new(store.clone(), insights(store));

        let dto = handler
            .handle(
                &UpdateProjectCommand {
                    id: project.id(),
                    name: Some("LAUNCH".into()),
                    ..Default::default()
                },
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(dto.name, "LAUNCH");
    }
}
