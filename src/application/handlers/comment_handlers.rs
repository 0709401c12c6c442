//! Comment handlers

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::application::commands::{
    CreateCommentCommand, DeleteCommentCommand, UpdateCommentCommand,
};
use crate::application::dto::CommentDto;
use crate::application::error::{AppError, AppResult};
use crate::application::pipeline::{cancellable, RequestHandler};
use crate::application::ports::outbound::UnitOfWorkFactory;
use crate::application::queries::{GetCommentByIdQuery, GetCommentsForTodoQuery};
use crate::domain::entities::{Comment, EntityKind};
use crate::domain::value_objects::Content;

// =============================================================================
// Commands
// =============================================================================

pub struct CreateCommentHandler {
    store: Arc<dyn UnitOfWorkFactory>,
}

impl CreateCommentHandler {
    pub fn new(store: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler for CreateCommentHandler {
    type Request = CreateCommentCommand;

    #[instrument(skip_all, fields(todo_id = %request.todo_item_id))]
    async fn handle(
        &self,
        request: &CreateCommentCommand,
        cancel: &CancellationToken,
    ) -> AppResult<CommentDto> {
        let uow = self.store.begin();

        let mut todo = cancellable(cancel, uow.todos().get_by_id(request.todo_item_id))
            .await?
            .ok_or_else(|| AppError::not_found(EntityKind::Todo, request.todo_item_id))?;

        let comment = Comment::new(Content::create(&request.content)?, todo.id());
        todo.add_comment(comment.clone())?;

        cancellable(cancel, uow.comments().add(&comment)).await?;
        cancellable(cancel, uow.todos().update(&todo)).await?;
        cancellable(cancel, uow.save_changes()).await?;

        info!(comment_id = %comment.id(), "Added comment");
        Ok(CommentDto::from(&comment))
    }
}

pub struct UpdateCommentHandler {
    store: Arc<dyn UnitOfWorkFactory>,
}

impl UpdateCommentHandler {
    pub fn new(store: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler for UpdateCommentHandler {
    type Request = UpdateCommentCommand;

    #[instrument(skip_all, fields(comment_id = %request.id))]
    async fn handle(
        &self,
        request: &UpdateCommentCommand,
        cancel: &CancellationToken,
    ) -> AppResult<CommentDto> {
        let uow = self.store.begin();

        let mut comment = cancellable(cancel, uow.comments().get_by_id(request.id))
            .await?
            .ok_or_else(|| AppError::not_found(EntityKind::Comment, request.id))?;

        comment.update_content(Content::create(&request.content)?);

        cancellable(cancel, uow.comments().update(&comment)).await?;
        cancellable(cancel, uow.save_changes()).await?;

        info!(comment_id = %comment.id(), "Updated comment");
        Ok(CommentDto::from(&comment))
    }
}

pub struct DeleteCommentHandler {
    store: Arc<dyn UnitOfWorkFactory>,
}

impl DeleteCommentHandler {
    pub fn new(store: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler for DeleteCommentHandler {
    type Request = DeleteCommentCommand;

    #[instrument(skip_all, fields(comment_id = %request.id))]
    async fn handle(
        &self,
        request: &DeleteCommentCommand,
        cancel: &CancellationToken,
    ) -> AppResult<bool> {
        let uow = self.store.begin();

        let Some(comment) = cancellable(cancel, uow.comments().get_by_id(request.id)).await? else {
            debug!("Comment not found, nothing to delete");
            return Ok(false);
        };

        let todo_id = comment.todo_item_id();
        if let Some(todo) = cancellable(cancel, uow.todos().get_by_id(todo_id)).await? {
            let loaded = cancellable(
                cancel,
                uow.comments().find(&|c: &Comment| c.todo_item_id() == todo_id),
            )
            .await?;
            let mut todo = todo.with_comments(loaded);
            if todo.remove_comment(comment.id()) {
                cancellable(cancel, uow.todos().update(&todo)).await?;
            }
        }

        cancellable(cancel, uow.comments().remove(&comment)).await?;
        cancellable(cancel, uow.save_changes()).await?;

        info!("Deleted comment");
        Ok(true)
    }
}

// =============================================================================
// Queries
// =============================================================================

pub struct GetCommentsForTodoHandler {
    store: Arc<dyn UnitOfWorkFactory>,
}

impl GetCommentsForTodoHandler {
    pub fn new(store: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler for GetCommentsForTodoHandler {
    type Request = GetCommentsForTodoQuery;

    #[instrument(skip_all, fields(todo_id = %request.todo_item_id))]
    async fn handle(
        &self,
        request: &GetCommentsForTodoQuery,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<CommentDto>> {
        debug!("Listing comments");
        let uow = self.store.begin();

        let todo_id = request.todo_item_id;
        let comments = cancellable(
            cancel,
            uow.comments().find(&|c: &Comment| c.todo_item_id() == todo_id),
        )
        .await?;

        Ok(comments.iter().map(CommentDto::from).collect())
    }
}

pub struct GetCommentByIdHandler {
    store: Arc<dyn UnitOfWorkFactory>,
}

impl GetCommentByIdHandler {
    pub fn new(store: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler for GetCommentByIdHandler {
    type Request = GetCommentByIdQuery;

    #[instrument(skip_all, fields(comment_id = %request.id))]
    async fn handle(
        &self,
        request: &GetCommentByIdQuery,
        cancel: &CancellationToken,
    ) -> AppResult<Option<CommentDto>> {
        let uow = self.store.begin();
        let comment = cancellable(cancel, uow.comments().get_by_id(request.id)).await?;
        Ok(comment.as_ref().map(CommentDto::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::SpyStore;
    use crate::domain::entities::{Entity, TodoItem};
    use crate::domain::value_objects::{CommentId, ProjectId, Title, TodoId, UserId};

    fn todo() -> TodoItem {
        TodoItem::new(
            Title::create("Write spec").unwrap(),
            ProjectId::new(),
            UserId::create("a@b.com").unwrap(),
            None,
        )
        .detached()
    }

    #[tokio::test]
    async fn comments_attach_to_their_todo() {
        let todo = todo();
        let store = SpyStore::new().and_todos(vec![todo.clone()]);
        let handler = CreateCommentHandler::new(store.clone());

        let dto = handler
            .handle(
                &CreateCommentCommand {
                    content: "  Looks good ".into(),
                    todo_item_id: todo.id(),
                },
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(dto.content, "Looks good");
        assert_eq!(dto.todo_item_id, todo.id());
        assert_eq!(
            store.calls(),
            vec!["todos.get_by_id", "comments.add", "todos.update", "save_changes"]
        );
    }

    #[tokio::test]
    async fn comment_on_missing_todo_is_not_found() {
        let handler = CreateCommentHandler::new(SpyStore::new());

        let err = handler
            .handle(
                &CreateCommentCommand {
                    content: "hello".into(),
                    todo_item_id: TodoId::new(),
                },
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::NotFound {
                entity: EntityKind::Todo,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn update_and_delete_existing_comment() {
        let todo = todo();
        let comment = Comment::new(Content::create("first").unwrap(), todo.id());
        let store = SpyStore::new()
            .and_todos(vec![todo.clone()])
            .and_comments(vec![comment.clone()]);
        let cancel = CancellationToken::new();

        let dto = UpdateCommentHandler::new(store.clone())
            .handle(
                &UpdateCommentCommand {
                    id: comment.id(),
                    content: "second".into(),
                },
                &cancel,
            )
            .await
            .unwrap();
        assert_eq!(dto.content, "second");
        assert!(dto.updated_at.is_some());

        let delete = DeleteCommentHandler::new(store.clone());
        assert!(delete
            .handle(&DeleteCommentCommand { id: comment.id() }, &cancel)
            .await
            .unwrap());
        assert!(!delete
            .handle(&DeleteCommentCommand { id: CommentId::new() }, &cancel)
            .await
            .unwrap());

        let remaining = GetCommentsForTodoHandler::new(store)
            .handle(
                &GetCommentsForTodoQuery {
                    todo_item_id: todo.id(),
                },
                &cancel,
            )
            .await
            .unwrap();
        assert!(remaining.is_empty());
    }
}
