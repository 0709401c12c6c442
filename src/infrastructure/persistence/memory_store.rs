//! In-memory store - Process-local tables behind the unit of work port
//!
//! Reads see committed rows only. Writes are staged on the unit of work and
//! applied together by `save_changes` under a single write lock: either every
//! staged change lands, cascades included, or none does.

use std::collections::{HashMap, HashSet};
use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::application::ports::outbound::{
    PersistenceError, Predicate, Repository, UnitOfWork, UnitOfWorkFactory,
};
use crate::domain::entities::{Comment, Entity, Project, TodoItem};
use crate::domain::value_objects::{CommentId, ProjectId, TodoId};

// =============================================================================
// Tables
// =============================================================================

#[derive(Debug, Clone)]
struct Row<T> {
    /// Insertion order; listings are returned oldest first
    seq: u64,
    entity: T,
}

#[derive(Debug, Clone)]
struct Table<T: Entity> {
    rows: HashMap<T::Id, Row<T>>,
}

impl<T: Entity> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
        }
    }
}

impl<T: Entity> Table<T> {
    fn get(&self, id: T::Id) -> Option<T> {
        self.rows.get(&id).map(|row| row.entity.clone())
    }

    fn contains(&self, id: T::Id) -> bool {
        self.rows.contains_key(&id)
    }

    fn ordered(&self) -> impl Iterator<Item = &T> {
        let mut rows: Vec<&Row<T>> = self.rows.values().collect();
        rows.sort_by_key(|row| row.seq);
        rows.into_iter().map(|row| &row.entity)
    }
}

#[derive(Debug, Clone, Default)]
struct Tables {
    projects: Table<Project>,
    todos: Table<TodoItem>,
    comments: Table<Comment>,
    next_seq: u64,
}

impl Tables {
    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}

/// Entities with a table in the in-memory store
trait Stored: Entity {
    fn table(tables: &Tables) -> &Table<Self>;

    fn table_mut(tables: &mut Tables) -> &mut Table<Self>;
}

impl Stored for Project {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.projects
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.projects
    }
}

impl Stored for TodoItem {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.todos
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.todos
    }
}

impl Stored for Comment {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.comments
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.comments
    }
}

// =============================================================================
// Database
// =============================================================================

/// Shared handle to the in-memory tables
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<Tables>>,
    offline: Arc<AtomicBool>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// While offline every operation fails with `PersistenceError::Unavailable`
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<(), PersistenceError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable(
                "in-memory store is offline".to_string(),
            ));
        }
        Ok(())
    }
}

impl UnitOfWorkFactory for InMemoryDatabase {
    fn begin(&self) -> Box<dyn UnitOfWork> {
        Box::new(InMemoryUnitOfWork::new(self.clone()))
    }
}

// =============================================================================
// Repositories
// =============================================================================

enum Change<T: Entity> {
    Add(T),
    Update(T),
    Remove(T::Id),
}

struct MemoryRepository<T: Entity> {
    db: InMemoryDatabase,
    staged: Mutex<Vec<Change<T>>>,
}

impl<T: Entity> MemoryRepository<T> {
    fn new(db: InMemoryDatabase) -> Self {
        Self {
            db,
            staged: Mutex::new(Vec::new()),
        }
    }

    async fn take_staged(&self) -> Vec<Change<T>> {
        mem::take(&mut *self.staged.lock().await)
    }

    async fn stage(&self, change: Change<T>) -> Result<(), PersistenceError> {
        self.db.ensure_online()?;
        self.staged.lock().await.push(change);
        Ok(())
    }
}

#[async_trait]
impl<T: Stored> Repository<T> for MemoryRepository<T> {
    async fn get_by_id(&self, id: T::Id) -> Result<Option<T>, PersistenceError> {
        self.db.ensure_online()?;
        let tables = self.db.tables.read().await;
        Ok(T::table(&tables).get(id))
    }

    async fn get_all(&self) -> Result<Vec<T>, PersistenceError> {
        self.db.ensure_online()?;
        let tables = self.db.tables.read().await;
        Ok(T::table(&tables).ordered().cloned().collect())
    }

    async fn find(&self, predicate: Predicate<'_, T>) -> Result<Vec<T>, PersistenceError> {
        self.db.ensure_online()?;
        let tables = self.db.tables.read().await;
        Ok(T::table(&tables)
            .ordered()
            .filter(|entity| predicate(*entity))
            .cloned()
            .collect())
    }

    async fn add(&self, entity: &T) -> Result<T, PersistenceError> {
        let stored = entity.detached();
        self.stage(Change::Add(stored.clone())).await?;
        Ok(stored)
    }

    async fn update(&self, entity: &T) -> Result<(), PersistenceError> {
        self.stage(Change::Update(entity.detached())).await
    }

    async fn remove(&self, entity: &T) -> Result<(), PersistenceError> {
        self.stage(Change::Remove(entity.id())).await
    }

    async fn exists(&self, id: T::Id) -> Result<bool, PersistenceError> {
        self.db.ensure_online()?;
        let tables = self.db.tables.read().await;
        Ok(T::table(&tables).contains(id))
    }
}

// =============================================================================
// Unit of Work
// =============================================================================

struct InMemoryUnitOfWork {
    db: InMemoryDatabase,
    projects: MemoryRepository<Project>,
    todos: MemoryRepository<TodoItem>,
    comments: MemoryRepository<Comment>,
    /// Committed state captured by `begin_transaction`
    snapshot: Mutex<Option<Tables>>,
}

impl InMemoryUnitOfWork {
    fn new(db: InMemoryDatabase) -> Self {
        Self {
            projects: MemoryRepository::new(db.clone()),
            todos: MemoryRepository::new(db.clone()),
            comments: MemoryRepository::new(db.clone()),
            snapshot: Mutex::new(None),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    fn todos(&self) -> &dyn Repository<TodoItem> {
        &self.todos
    }

    fn projects(&self) -> &dyn Repository<Project> {
        &self.projects
    }

    fn comments(&self) -> &dyn Repository<Comment> {
        &self.comments
    }

    async fn save_changes(&self) -> Result<usize, PersistenceError> {
        let projects = self.projects.take_staged().await;
        let todos = self.todos.take_staged().await;
        let comments = self.comments.take_staged().await;
        self.db.ensure_online()?;

        let mut tables = self.db.tables.write().await;
        let mut next = tables.clone();

        let mut removed = Removals::default();
        let mut affected = apply(&mut next, projects, &mut removed.projects)?;
        affected += apply(&mut next, todos, &mut removed.todos)?;
        affected += apply(&mut next, comments, &mut removed.comments)?;
        affected += removed.cascade(&mut next);
        check_references(&next)?;

        *tables = next;
        debug!(affected, "Saved changes");
        Ok(affected)
    }

    async fn begin_transaction(&self) -> Result<(), PersistenceError> {
        self.db.ensure_online()?;
        let mut snapshot = self.snapshot.lock().await;
        if snapshot.is_some() {
            return Err(PersistenceError::Transaction(
                "a transaction is already in progress".to_string(),
            ));
        }
        *snapshot = Some(self.db.tables.read().await.clone());
        Ok(())
    }

    async fn commit(&self) -> Result<(), PersistenceError> {
        match self.snapshot.lock().await.take() {
            Some(_) => Ok(()),
            None => Err(PersistenceError::Transaction(
                "no transaction in progress".to_string(),
            )),
        }
    }

    async fn rollback(&self) -> Result<(), PersistenceError> {
        let Some(snapshot) = self.snapshot.lock().await.take() else {
            return Err(PersistenceError::Transaction(
                "no transaction in progress".to_string(),
            ));
        };

        self.projects.take_staged().await;
        self.todos.take_staged().await;
        self.comments.take_staged().await;
        *self.db.tables.write().await = snapshot;

        warn!("Transaction rolled back");
        Ok(())
    }
}

/// Apply inserts and updates, collecting removals for the cascade pass
fn apply<T: Stored>(
    tables: &mut Tables,
    changes: Vec<Change<T>>,
    removed: &mut Vec<T::Id>,
) -> Result<usize, PersistenceError> {
    let mut affected = 0;
    for change in changes {
        match change {
            Change::Add(entity) => {
                let id = entity.id();
                if T::table(tables).contains(id) {
                    return Err(PersistenceError::Conflict(format!(
                        "{} {} already exists",
                        T::KIND,
                        id
                    )));
                }
                let seq = tables.next_seq();
                T::table_mut(tables).rows.insert(id, Row { seq, entity });
            }
            Change::Update(entity) => {
                let id = entity.id();
                match T::table_mut(tables).rows.get_mut(&id) {
                    Some(row) => row.entity = entity,
                    None => {
                        return Err(PersistenceError::Conflict(format!(
                            "{} {} no longer exists",
                            T::KIND,
                            id
                        )))
                    }
                }
            }
            Change::Remove(id) => {
                removed.push(id);
                continue;
            }
        }
        affected += 1;
    }
    Ok(affected)
}

#[derive(Default)]
struct Removals {
    projects: Vec<ProjectId>,
    todos: Vec<TodoId>,
    comments: Vec<CommentId>,
}

impl Removals {
    /// Remove projects, then todos, then comments, following ownership down
    fn cascade(mut self, tables: &mut Tables) -> usize {
        let mut affected = 0;

        let projects: HashSet<ProjectId> = self.projects.into_iter().collect();
        for id in &projects {
            if tables.projects.rows.remove(id).is_some() {
                affected += 1;
            }
        }
        self.todos.extend(
            tables
                .todos
                .rows
                .values()
                .filter(|row| projects.contains(&row.entity.project_id()))
                .map(|row| row.entity.id()),
        );

        let todos: HashSet<TodoId> = self.todos.into_iter().collect();
        for id in &todos {
            if tables.todos.rows.remove(id).is_some() {
                affected += 1;
            }
        }
        self.comments.extend(
            tables
                .comments
                .rows
                .values()
                .filter(|row| todos.contains(&row.entity.todo_item_id()))
                .map(|row| row.entity.id()),
        );

        let comments: HashSet<CommentId> = self.comments.into_iter().collect();
        for id in &comments {
            if tables.comments.rows.remove(id).is_some() {
                affected += 1;
            }
        }

        affected
    }
}

/// Every todo needs its project and every comment its todo
fn check_references(tables: &Tables) -> Result<(), PersistenceError> {
    if let Some(orphan) = tables
        .todos
        .rows
        .values()
        .find(|row| !tables.projects.contains(row.entity.project_id()))
    {
        return Err(PersistenceError::Conflict(format!(
            "Project {} referenced by todo item {} does not exist",
            orphan.entity.project_id(),
            orphan.entity.id()
        )));
    }
    if let Some(orphan) = tables
        .comments
        .rows
        .values()
        .find(|row| !tables.todos.contains(row.entity.todo_item_id()))
    {
        return Err(PersistenceError::Conflict(format!(
            "Todo item {} referenced by comment {} does not exist",
            orphan.entity.todo_item_id(),
            orphan.entity.id()
        )));
    }
    Ok(())
}
