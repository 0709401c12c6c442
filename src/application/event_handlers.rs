//! Domain event subscribers that live in the application layer

use async_trait::async_trait;
use tracing::info;

use crate::application::ports::outbound::{EventSubscriber, PublishError};
use crate::domain::events::DomainEvent;

/// Writes one structured log line per todo event
#[derive(Debug, Default)]
pub struct TodoActivityLog;

#[async_trait]
impl EventSubscriber for TodoActivityLog {
    fn name(&self) -> &'static str {
        "todo_activity_log"
    }

    async fn handle(&self, event: &DomainEvent) -> Result<(), PublishError> {
        match event {
            DomainEvent::TodoCompleted {
                metadata,
                todo_id,
                user_id,
                ..
            } => {
                info!(
                    todo_id = %todo_id,
                    user_id = %user_id,
                    completed_at = %metadata.occurred_at,
                    "Todo item completed"
                );
            }
            other => {
                info!(
                    event_type = other.event_type(),
                    event_id = %other.id(),
                    todo_id = %other.todo_id(),
                    "Todo activity"
                );
            }
        }
        Ok(())
    }
}
