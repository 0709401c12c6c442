//! Repository ports - Interfaces for data persistence
//!
//! These traits define the contracts that infrastructure stores must implement.
//! Handlers depend on these traits, not on concrete implementations.

use async_trait::async_trait;

use crate::domain::entities::{Comment, Entity, Project, TodoItem};

/// Failures raised by a store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Predicate used by `Repository::find`
pub type Predicate<'a, T> = &'a (dyn Fn(&T) -> bool + Send + Sync);

// =============================================================================
// Repository Port
// =============================================================================

/// Generic repository over one entity type
///
/// Reads observe committed state. Writes are staged and only become visible
/// once the owning unit of work saves its changes.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    async fn get_by_id(&self, id: T::Id) -> Result<Option<T>, PersistenceError>;

    async fn get_all(&self) -> Result<Vec<T>, PersistenceError>;

    async fn find(&self, predicate: Predicate<'_, T>) -> Result<Vec<T>, PersistenceError>;

    /// Stage an insert, returning the copy the store will keep
    async fn add(&self, entity: &T) -> Result<T, PersistenceError>;

    async fn update(&self, entity: &T) -> Result<(), PersistenceError>;

    /// Stage a removal; owned children are removed with it on save
    async fn remove(&self, entity: &T) -> Result<(), PersistenceError>;

    async fn exists(&self, id: T::Id) -> Result<bool, PersistenceError>;
}

// =============================================================================
// Unit of Work Port
// =============================================================================

/// Transactional boundary over the todo, project and comment repositories
///
/// One unit of work serves one request.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn todos(&self) -> &dyn Repository<TodoItem>;

    fn projects(&self) -> &dyn Repository<Project>;

    fn comments(&self) -> &dyn Repository<Comment>;

    /// Apply every staged change, returning the number of entities affected
    async fn save_changes(&self) -> Result<usize, PersistenceError>;

    async fn begin_transaction(&self) -> Result<(), PersistenceError>;

    async fn commit(&self) -> Result<(), PersistenceError>;

    async fn rollback(&self) -> Result<(), PersistenceError>;
}

/// Opens a fresh unit of work per request
pub trait UnitOfWorkFactory: Send + Sync {
    fn begin(&self) -> Box<dyn UnitOfWork>;
}
