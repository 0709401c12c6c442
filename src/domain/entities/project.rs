//! Project entity - Groups todo items owned by one user

use chrono::{DateTime, Utc};

use super::{DomainError, Entity, EntityKind, TodoItem};
use crate::domain::value_objects::{Description, Name, ProjectId, TodoId, UserId};

/// A project
///
/// Exclusively owns its todo items: deleting a project removes them (and their
/// comments) when the deletion is committed.
#[derive(Debug, Clone)]
pub struct Project {
    id: ProjectId,
    name: Name,
    description: Option<Description>,
    user_id: UserId,
    /// Only populated when explicitly loaded via `with_todo_items`
    todo_items: Vec<TodoItem>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl Project {
    pub fn new(name: Name, user_id: UserId, description: Option<Description>) -> Self {
        Self {
            id: ProjectId::new(),
            name,
            description,
            user_id,
            todo_items: Vec::new(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Attach an explicitly fetched todo collection
    pub fn with_todo_items(mut self, todo_items: Vec<TodoItem>) -> Self {
        self.todo_items = todo_items;
        self
    }

    pub fn id(&self) -> ProjectId {
        self.id
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn description(&self) -> Option<&Description> {
        self.description.as_ref()
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn todo_items(&self) -> &[TodoItem] {
        &self.todo_items
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn update_name(&mut self, name: Name) {
        self.name = name;
        self.touch();
    }

    pub fn update_description(&mut self, description: Option<Description>) {
        self.description = description;
        self.touch();
    }

    pub fn add_todo_item(&mut self, todo: TodoItem) -> Result<(), DomainError> {
        if todo.project_id() != self.id {
            return Err(DomainError::TodoBelongsToAnotherProject {
                todo_id: todo.id(),
                owner: todo.project_id(),
                target: self.id,
            });
        }
        self.todo_items.push(todo);
        self.touch();
        Ok(())
    }

    /// Returns whether a loaded todo item was removed
    pub fn remove_todo_item(&mut self, todo_id: TodoId) -> bool {
        let before = self.todo_items.len();
        self.todo_items.retain(|t| t.id() != todo_id);
        let removed = self.todo_items.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

impl Entity for Project {
    type Id = ProjectId;

    const KIND: EntityKind = EntityKind::Project;

    fn id(&self) -> ProjectId {
        self.id
    }

    fn detached(&self) -> Self {
        Self {
            todo_items: Vec::new(),
            ..self.clone()
        }
    }
}
