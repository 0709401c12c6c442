//! Domain layer - Core business logic with no knowledge of storage or transport
//!
//! This layer contains:
//! - Entities: TodoItem, Project, Comment
//! - Value Objects: Title, Description, Name, Content, UserId and identifiers
//! - Domain Events: State changes recorded by entities

pub mod entities;
pub mod events;
pub mod value_objects;
