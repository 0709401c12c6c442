//! Comment entity - A note attached to a todo item

use chrono::{DateTime, Utc};

use super::{Entity, EntityKind};
use crate::domain::value_objects::{CommentId, Content, TodoId};

/// A comment on a todo item
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    id: CommentId,
    content: Content,
    todo_item_id: TodoId,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn new(content: Content, todo_item_id: TodoId) -> Self {
        Self {
            id: CommentId::new(),
            content,
            todo_item_id,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn id(&self) -> CommentId {
        self.id
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn todo_item_id(&self) -> TodoId {
        self.todo_item_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn update_content(&mut self, content: Content) {
        self.content = content;
        self.updated_at = Some(Utc::now());
    }
}

impl Entity for Comment {
    type Id = CommentId;

    const KIND: EntityKind = EntityKind::Comment;

    fn id(&self) -> CommentId {
        self.id
    }

    fn detached(&self) -> Self {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_content_stamps_timestamp() {
        let mut comment = Comment::new(Content::create("first").unwrap(), TodoId::new());
        assert!(comment.updated_at().is_none());

        comment.update_content(Content::create("second").unwrap());
        assert_eq!(comment.content().value(), "second");
        assert!(comment.updated_at().is_some());
    }
}
