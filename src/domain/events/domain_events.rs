//! Domain events - Notifications of significant state changes
//!
//! Events are recorded on the entity during a mutation and handed to the
//! event publisher by the application layer once the change has been committed.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::value_objects::{EventId, ProjectId, TodoId};

/// Identity and timestamp shared by every event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetadata {
    pub event_id: EventId,
    /// When the event occurred
    pub occurred_at: DateTime<Utc>,
}

impl Default for EventMetadata {
    fn default() -> Self {
        Self {
            event_id: EventId::new(),
            occurred_at: Utc::now(),
        }
    }
}

/// All domain events in the system
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum DomainEvent {
    /// A todo item was created
    TodoCreated {
        metadata: EventMetadata,
        todo_id: TodoId,
        title: String,
        project_id: ProjectId,
        user_id: String,
    },

    /// A todo item moved from open to completed
    TodoCompleted {
        metadata: EventMetadata,
        todo_id: TodoId,
        project_id: ProjectId,
        user_id: String,
    },

    /// A completed todo item was reopened
    TodoUncompleted {
        metadata: EventMetadata,
        todo_id: TodoId,
        project_id: ProjectId,
        user_id: String,
    },

    /// A todo item was deleted
    TodoDeleted {
        metadata: EventMetadata,
        todo_id: TodoId,
        project_id: ProjectId,
        user_id: String,
    },
}

impl DomainEvent {
    /// Get the metadata for this event
    pub fn metadata(&self) -> &EventMetadata {
        match self {
            DomainEvent::TodoCreated { metadata, .. } => metadata,
            DomainEvent::TodoCompleted { metadata, .. } => metadata,
            DomainEvent::TodoUncompleted { metadata, .. } => metadata,
            DomainEvent::TodoDeleted { metadata, .. } => metadata,
        }
    }

    pub fn id(&self) -> EventId {
        self.metadata().event_id
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.metadata().occurred_at
    }

    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            DomainEvent::TodoCreated { .. } => "TodoCreated",
            DomainEvent::TodoCompleted { .. } => "TodoCompleted",
            DomainEvent::TodoUncompleted { .. } => "TodoUncompleted",
            DomainEvent::TodoDeleted { .. } => "TodoDeleted",
        }
    }

    /// The todo item the event is about
    pub fn todo_id(&self) -> TodoId {
        match self {
            DomainEvent::TodoCreated { todo_id, .. }
            | DomainEvent::TodoCompleted { todo_id, .. }
            | DomainEvent::TodoUncompleted { todo_id, .. }
            | DomainEvent::TodoDeleted { todo_id, .. } => *todo_id,
        }
    }

    /// Variant fields without the type tag and metadata
    pub fn payload(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(fields) = value.as_object_mut() {
            fields.remove("type");
            fields.remove("metadata");
        }
        value
    }
}
