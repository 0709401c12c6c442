//! TodoItem entity - A unit of work inside a project

use chrono::{DateTime, Utc};

use super::{Comment, DomainError, Entity, EntityKind};
use crate::domain::events::{DomainEvent, EventMetadata};
use crate::domain::value_objects::{CommentId, Description, ProjectId, Title, TodoId, UserId};

/// A to-do item
///
/// Belongs to exactly one project and owns its comments. Every state change goes
/// through a named method that stamps `updated_at`; completion transitions and
/// deletion record domain events for the caller to publish after commit.
#[derive(Debug, Clone)]
pub struct TodoItem {
    id: TodoId,
    title: Title,
    description: Option<Description>,
    is_completed: bool,
    project_id: ProjectId,
    user_id: UserId,
    /// Only populated when explicitly loaded via `with_comments`
    comments: Vec<Comment>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    events: Vec<DomainEvent>,
}

impl TodoItem {
    pub fn new(
        title: Title,
        project_id: ProjectId,
        user_id: UserId,
        description: Option<Description>,
    ) -> Self {
        let mut todo = Self {
            id: TodoId::new(),
            title,
            description,
            is_completed: false,
            project_id,
            user_id,
            comments: Vec::new(),
            created_at: Utc::now(),
            updated_at: None,
            events: Vec::new(),
        };
        todo.events.push(DomainEvent::TodoCreated {
            metadata: EventMetadata::default(),
            todo_id: todo.id,
            title: todo.title.value().to_string(),
            project_id,
            user_id: todo.user_id.value().to_string(),
        });
        todo
    }

    /// Attach an explicitly fetched comment collection
    pub fn with_comments(mut self, comments: Vec<Comment>) -> Self {
        self.comments = comments;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn id(&self) -> TodoId {
        self.id
    }

    pub fn title(&self) -> &Title {
        &self.title
    }

    pub fn description(&self) -> Option<&Description> {
        self.description.as_ref()
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Events recorded and not yet drained
    pub fn domain_events(&self) -> &[DomainEvent] {
        &self.events
    }

    // ========================================================================
    // Mutators
    // ========================================================================

    pub fn update_title(&mut self, title: Title) {
        self.title = title;
        self.touch();
    }

    pub fn update_description(&mut self, description: Option<Description>) {
        self.description = description;
        self.touch();
    }

    /// Move the item to another project; the caller has verified it exists
    pub fn update_project(&mut self, project_id: ProjectId) {
        self.project_id = project_id;
        self.touch();
    }

    /// Mark as completed; a no-op if already completed
    pub fn mark_as_completed(&mut self) {
        if self.is_completed {
            return;
        }
        self.is_completed = true;
        self.touch();
        self.events.push(DomainEvent::TodoCompleted {
            metadata: EventMetadata::default(),
            todo_id: self.id,
            project_id: self.project_id,
            user_id: self.user_id.value().to_string(),
        });
    }

    /// Reopen the item; a no-op if it is not completed
    pub fn mark_as_incomplete(&mut self) {
        if !self.is_completed {
            return;
        }
        self.is_completed = false;
        self.touch();
        self.events.push(DomainEvent::TodoUncompleted {
            metadata: EventMetadata::default(),
            todo_id: self.id,
            project_id: self.project_id,
            user_id: self.user_id.value().to_string(),
        });
    }

    pub fn add_comment(&mut self, comment: Comment) -> Result<(), DomainError> {
        if comment.todo_item_id() != self.id {
            return Err(DomainError::CommentBelongsToAnotherTodo {
                comment_id: comment.id(),
                owner: comment.todo_item_id(),
                target: self.id,
            });
        }
        self.comments.push(comment);
        self.touch();
        Ok(())
    }

    /// Returns whether a loaded comment was removed
    pub fn remove_comment(&mut self, comment_id: CommentId) -> bool {
        let before = self.comments.len();
        self.comments.retain(|c| c.id() != comment_id);
        let removed = self.comments.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    /// Record the deletion; removing the item is the repository's job
    pub fn delete(&mut self) {
        self.events.push(DomainEvent::TodoDeleted {
            metadata: EventMetadata::default(),
            todo_id: self.id,
            project_id: self.project_id,
            user_id: self.user_id.value().to_string(),
        });
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

impl Entity for TodoItem {
    type Id = TodoId;

    const KIND: EntityKind = EntityKind::Todo;

    fn id(&self) -> TodoId {
        self.id
    }

    fn detached(&self) -> Self {
        Self {
            comments: Vec::new(),
            events: Vec::new(),
            ..self.clone()
        }
    }

    fn take_domain_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }
}
