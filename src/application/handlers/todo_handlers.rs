//! Todo item handlers

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use super::{optional_description, publish_committed};
use crate::application::commands::{CreateTodoCommand, DeleteTodoCommand, UpdateTodoCommand};
use crate::application::dto::TodoItemDto;
use crate::application::error::{AppError, AppResult};
use crate::application::pipeline::{cancellable, RequestHandler};
use crate::application::ports::outbound::{EventPublisher, UnitOfWork, UnitOfWorkFactory};
use crate::application::queries::{GetAllTodosQuery, GetTodoByIdQuery};
use crate::domain::entities::{Comment, Entity, EntityKind, TodoItem};
use crate::domain::value_objects::{Title, TodoId, UserId};

// =============================================================================
// Commands
// =============================================================================

pub struct CreateTodoHandler {
    store: Arc<dyn UnitOfWorkFactory>,
    publisher: Arc<dyn EventPublisher>,
}

impl CreateTodoHandler {
    pub fn new(store: Arc<dyn UnitOfWorkFactory>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self { store, publisher }
    }
}

#[async_trait]
impl RequestHandler for CreateTodoHandler {
    type Request = CreateTodoCommand;

    #[instrument(skip_all, fields(project_id = %request.project_id))]
    async fn handle(
        &self,
        request: &CreateTodoCommand,
        cancel: &CancellationToken,
    ) -> AppResult<TodoItemDto> {
        let uow = self.store.begin();

        let mut project = cancellable(cancel, uow.projects().get_by_id(request.project_id))
            .await?
            .ok_or_else(|| AppError::not_found(EntityKind::Project, request.project_id))?;

        let title = Title::create(&request.title)?;
        let description = match request.description.as_deref() {
            Some(raw) => optional_description(raw)?,
            None => None,
        };
        let user_id = UserId::create(&request.user_id)?;

        let mut todo = TodoItem::new(title, project.id(), user_id, description);
        project.add_todo_item(todo.clone())?;

        cancellable(cancel, uow.todos().add(&todo)).await?;
        cancellable(cancel, uow.projects().update(&project)).await?;
        cancellable(cancel, uow.save_changes()).await?;

        info!(todo_id = %todo.id(), "Created todo item: {}", todo.title());
        publish_committed(self.publisher.as_ref(), todo.take_domain_events()).await;

        Ok(TodoItemDto::from(&todo))
    }
}

pub struct UpdateTodoHandler {
    store: Arc<dyn UnitOfWorkFactory>,
    publisher: Arc<dyn EventPublisher>,
}

impl UpdateTodoHandler {
    pub fn new(store: Arc<dyn UnitOfWorkFactory>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self { store, publisher }
    }
}

#[async_trait]
impl RequestHandler for UpdateTodoHandler {
    type Request = UpdateTodoCommand;

    #[instrument(skip_all, fields(todo_id = %request.id))]
    async fn handle(
        &self,
        request: &UpdateTodoCommand,
        cancel: &CancellationToken,
    ) -> AppResult<TodoItemDto> {
        let uow = self.store.begin();

        let mut todo = cancellable(cancel, uow.todos().get_by_id(request.id))
            .await?
            .ok_or_else(|| AppError::not_found(EntityKind::Todo, request.id))?;

        if let Some(project_id) = request.project_id.filter(|id| *id != todo.project_id()) {
            let mut target = cancellable(cancel, uow.projects().get_by_id(project_id))
                .await?
                .ok_or_else(|| AppError::not_found(EntityKind::Project, project_id))?;

            release_from_project(uow.as_ref(), &todo, cancel).await?;
            todo.update_project(project_id);
            target.add_todo_item(todo.clone())?;
            cancellable(cancel, uow.projects().update(&target)).await?;
        }

        if let Some(title) = request.title.as_deref().filter(|t| !t.trim().is_empty()) {
            todo.update_title(Title::create(title)?);
        }

        if let Some(raw) = request.description.as_deref() {
            todo.update_description(optional_description(raw)?);
        }

        match request.is_completed {
            Some(true) => todo.mark_as_completed(),
            Some(false) => todo.mark_as_incomplete(),
            None => {}
        }

        cancellable(cancel, uow.todos().update(&todo)).await?;
        cancellable(cancel, uow.save_changes()).await?;

        info!(todo_id = %todo.id(), completed = todo.is_completed(), "Updated todo item");
        publish_committed(self.publisher.as_ref(), todo.take_domain_events()).await;

        Ok(TodoItemDto::from(&todo))
    }
}

pub struct DeleteTodoHandler {
    store: Arc<dyn UnitOfWorkFactory>,
    publisher: Arc<dyn EventPublisher>,
}

impl DeleteTodoHandler {
    pub fn new(store: Arc<dyn UnitOfWorkFactory>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self { store, publisher }
    }
}

#[async_trait]
impl RequestHandler for DeleteTodoHandler {
    type Request = DeleteTodoCommand;

    #[instrument(skip_all, fields(todo_id = %request.id))]
    async fn handle(&self, request: &DeleteTodoCommand, cancel: &CancellationToken) -> AppResult<bool> {
        let uow = self.store.begin();

        let Some(mut todo) = cancellable(cancel, uow.todos().get_by_id(request.id)).await? else {
            debug!("Todo item not found, nothing to delete");
            return Ok(false);
        };

        todo.delete();
        release_from_project(uow.as_ref(), &todo, cancel).await?;

        cancellable(cancel, uow.todos().remove(&todo)).await?;
        let affected = cancellable(cancel, uow.save_changes()).await?;

        info!(affected, "Deleted todo item: {}", todo.title());
        publish_committed(self.publisher.as_ref(), todo.take_domain_events()).await;

        Ok(true)
    }
}

/// Drop `todo` from the project that currently owns it
async fn release_from_project(
    uow: &dyn UnitOfWork,
    todo: &TodoItem,
    cancel: &CancellationToken,
) -> AppResult<()> {
    let project_id = todo.project_id();
    let Some(project) = cancellable(cancel, uow.projects().get_by_id(project_id)).await? else {
        return Ok(());
    };

    let siblings = cancellable(
        cancel,
        uow.todos().find(&|t: &TodoItem| t.project_id() == project_id),
    )
    .await?;
    let mut project = project.with_todo_items(siblings);
    if project.remove_todo_item(todo.id()) {
        cancellable(cancel, uow.projects().update(&project)).await?;
    }
    Ok(())
}

// =============================================================================
// Queries
// =============================================================================

pub struct GetAllTodosHandler {
    store: Arc<dyn UnitOfWorkFactory>,
}

impl GetAllTodosHandler {
    pub fn new(store: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler for GetAllTodosHandler {
    type Request = GetAllTodosQuery;

    #[instrument(skip_all)]
    async fn handle(
        &self,
        _request: &GetAllTodosQuery,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<TodoItemDto>> {
        debug!("Listing all todo items");
        let uow = self.store.begin();

        let todos = cancellable(cancel, uow.todos().get_all()).await?;
        let mut comments: HashMap<TodoId, Vec<Comment>> = HashMap::new();
        for comment in cancellable(cancel, uow.comments().get_all()).await? {
            comments.entry(comment.todo_item_id()).or_default().push(comment);
        }

        Ok(todos
            .into_iter()
            .map(|todo| {
                let loaded = comments.remove(&todo.id()).unwrap_or_default();
                TodoItemDto::from(&todo.with_comments(loaded))
            })
            .collect())
    }
}

pub struct GetTodoByIdHandler {
    store: Arc<dyn UnitOfWorkFactory>,
}

impl GetTodoByIdHandler {
    pub fn new(store: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler for GetTodoByIdHandler {
    type Request = GetTodoByIdQuery;

    #[instrument(skip_all, fields(todo_id = %request.id))]
    async fn handle(
        &self,
        request: &GetTodoByIdQuery,
        cancel: &CancellationToken,
    ) -> AppResult<Option<TodoItemDto>> {
        debug!("Fetching todo item");
        let uow = self.store.begin();

        let Some(todo) = cancellable(cancel, uow.todos().get_by_id(request.id)).await? else {
            return Ok(None);
        };
        let todo_id = todo.id();
        let comments = cancellable(
            cancel,
            uow.comments().find(&|c: &Comment| c.todo_item_id() == todo_id),
        )
        .await?;

        Ok(Some(TodoItemDto::from(&todo.with_comments(comments))))
    }
}
