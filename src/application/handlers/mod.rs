//! Request handlers - One handler per command or query
//!
//! Every call opens its own unit of work. Mutations stage their changes, save
//! them, and only then hand the recorded domain events to the publisher.

mod comment_handlers;
mod project_handlers;
mod todo_handlers;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use tracing::error;

use crate::application::commands::{
    CreateCommentCommand, CreateProjectCommand, CreateTodoCommand, UpdateCommentCommand,
    UpdateProjectCommand, UpdateTodoCommand,
};
use crate::application::pipeline::{FieldRules, HandlerRegistry};
use crate::application::ports::outbound::{EventPublisher, UnitOfWorkFactory};
use crate::application::services::{ProjectInsightsService, ProjectNameUniqueRule};
use crate::domain::events::DomainEvent;
use crate::domain::value_objects::{Description, FieldError};

pub use comment_handlers::{
    CreateCommentHandler, DeleteCommentHandler, GetCommentByIdHandler,
    GetCommentsForTodoHandler, UpdateCommentHandler,
};
pub use project_handlers::{
    CreateProjectHandler, DeleteProjectHandler, GetAllProjectsHandler, GetProjectByIdHandler,
    GetProjectStatsHandler, UpdateProjectHandler,
};
pub use todo_handlers::{
    CreateTodoHandler, DeleteTodoHandler, GetAllTodosHandler, GetTodoByIdHandler,
    UpdateTodoHandler,
};

/// Register every handler and validator the engine serves
pub fn build_registry(
    store: Arc<dyn UnitOfWorkFactory>,
    publisher: Arc<dyn EventPublisher>,
) -> HandlerRegistry {
    let insights = Arc::new(ProjectInsightsService::new(store.clone()));

    HandlerRegistry::builder()
        // Todo items
        .validator(FieldRules::<CreateTodoCommand>::new())
        .validator(FieldRules::<UpdateTodoCommand>::new())
        .handler(CreateTodoHandler::new(store.clone(), publisher.clone()))
        .handler(UpdateTodoHandler::new(store.clone(), publisher.clone()))
        .handler(DeleteTodoHandler::new(store.clone(), publisher))
        .handler(GetAllTodosHandler::new(store.clone()))
        .handler(GetTodoByIdHandler::new(store.clone()))
        // Projects
        .validator(FieldRules::<CreateProjectCommand>::new())
        .validator(ProjectNameUniqueRule::new(insights.clone()))
        .validator(FieldRules::<UpdateProjectCommand>::new())
        .handler(CreateProjectHandler::new(store.clone()))
        .handler(UpdateProjectHandler::new(store.clone(), insights.clone()))
        .handler(DeleteProjectHandler::new(store.clone()))
        .handler(GetAllProjectsHandler::new(store.clone()))
        .handler(GetProjectByIdHandler::new(store.clone()))
        .handler(GetProjectStatsHandler::new(insights))
        // Comments
        .validator(FieldRules::<CreateCommentCommand>::new())
        .validator(FieldRules::<UpdateCommentCommand>::new())
        .handler(CreateCommentHandler::new(store.clone()))
        .handler(UpdateCommentHandler::new(store.clone()))
        .handler(DeleteCommentHandler::new(store.clone()))
        .handler(GetCommentsForTodoHandler::new(store.clone()))
        .handler(GetCommentByIdHandler::new(store))
        .build()
}

/// Hand committed events to the publisher in order
///
/// The write is already durable, so a failed delivery is logged and skipped.
pub(crate) async fn publish_committed(publisher: &dyn EventPublisher, events: Vec<DomainEvent>) {
    for event in events {
        if let Err(e) = publisher.publish(&event).await {
            error!(
                event_type = event.event_type(),
                event_id = %event.id(),
                todo_id = %event.todo_id(),
                error = %e,
                "Failed to publish domain event"
            );
        }
    }
}

/// A supplied description; blank input means "no description"
pub(crate) fn optional_description(raw: &str) -> Result<Option<Description>, FieldError> {
    let description = Description::create(raw)?;
    Ok((!description.is_empty()).then_some(description))
}
