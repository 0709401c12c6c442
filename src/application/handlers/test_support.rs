//! Call-recording store and publisher for handler tests

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::application::ports::outbound::{
    EventPublisher, PersistenceError, Predicate, PublishError, Repository, UnitOfWork,
    UnitOfWorkFactory,
};
use crate::domain::entities::{Comment, Entity, Project, TodoItem};
use crate::domain::events::DomainEvent;

type Calls = Arc<Mutex<Vec<String>>>;

/// Store whose writes apply immediately and whose every call is recorded
#[derive(Default)]
pub(crate) struct SpyStore {
    projects: Arc<Mutex<Vec<Project>>>,
    todos: Arc<Mutex<Vec<TodoItem>>>,
    comments: Arc<Mutex<Vec<Comment>>>,
    calls: Calls,
    fail_saves: AtomicBool,
}

impl SpyStore {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn with_projects(projects: Vec<Project>) -> Arc<Self> {
        let store = Self::default();
        *store.projects.lock().unwrap() = projects;
        Arc::new(store)
    }

    pub(crate) fn and_todos(self: Arc<Self>, todos: Vec<TodoItem>) -> Arc<Self> {
        self.todos.lock().unwrap().extend(todos);
        self
    }

    pub(crate) fn and_comments(self: Arc<Self>, comments: Vec<Comment>) -> Arc<Self> {
        self.comments.lock().unwrap().extend(comments);
        self
    }

    pub(crate) fn failing_saves(self: Arc<Self>) -> Arc<Self> {
        self.fail_saves.store(true, Ordering::SeqCst);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn called(&self, call: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|c| c == call)
    }
}

impl UnitOfWorkFactory for SpyStore {
    fn begin(&self) -> Box<dyn UnitOfWork> {
        Box::new(SpyUnitOfWork {
            projects: SpyRepository::new("projects", self.projects.clone(), self.calls.clone()),
            todos: SpyRepository::new("todos", self.todos.clone(), self.calls.clone()),
            comments: SpyRepository::new("comments", self.comments.clone(), self.calls.clone()),
            calls: self.calls.clone(),
            fail_saves: self.fail_saves.load(Ordering::SeqCst),
        })
    }
}

struct SpyUnitOfWork {
    projects: SpyRepository<Project>,
    todos: SpyRepository<TodoItem>,
    comments: SpyRepository<Comment>,
    calls: Calls,
    fail_saves: bool,
}

impl SpyUnitOfWork {
    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

#[async_trait]
impl UnitOfWork for SpyUnitOfWork {
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
        self.record("save_changes");
        if self.fail_saves {
            return Err(PersistenceError::Unavailable("spy store is offline".into()));
        }
        Ok(1)
    }

    async fn begin_transaction(&self) -> Result<(), PersistenceError> {
        self.record("begin_transaction");
        Ok(())
    }

    async fn commit(&self) -> Result<(), PersistenceError> {
        self.record("commit");
        Ok(())
    }

    async fn rollback(&self) -> Result<(), PersistenceError> {
        self.record("rollback");
        Ok(())
    }
}

struct SpyRepository<T> {
    prefix: &'static str,
    rows: Arc<Mutex<Vec<T>>>,
    calls: Calls,
}

impl<T: Entity> SpyRepository<T> {
    fn new(prefix: &'static str, rows: Arc<Mutex<Vec<T>>>, calls: Calls) -> Self {
        Self { prefix, rows, calls }
    }

    fn record(&self, operation: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{}.{}", self.prefix, operation));
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for SpyRepository<T> {
    async fn get_by_id(&self, id: T::Id) -> Result<Option<T>, PersistenceError> {
        self.record("get_by_id");
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id() == id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<T>, PersistenceError> {
        self.record("get_all");
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn find(&self, predicate: Predicate<'_, T>) -> Result<Vec<T>, PersistenceError> {
        self.record("find");
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| predicate(*r))
            .cloned()
            .collect())
    }

    async fn add(&self, entity: &T) -> Result<T, PersistenceError> {
        self.record("add");
        let stored = entity.detached();
        self.rows.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, entity: &T) -> Result<(), PersistenceError> {
        self.record("update");
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|r| r.id() == entity.id()) {
            *row = entity.detached();
        }
        Ok(())
    }

    async fn remove(&self, entity: &T) -> Result<(), PersistenceError> {
        self.record("remove");
        self.rows.lock().unwrap().retain(|r| r.id() != entity.id());
        Ok(())
    }

    async fn exists(&self, id: T::Id) -> Result<bool, PersistenceError> {
        self.record("exists");
        Ok(self.rows.lock().unwrap().iter().any(|r| r.id() == id))
    }
}

/// Publisher that keeps every event it is given
#[derive(Default)]
pub(crate) struct RecordingPublisher {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingPublisher {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn event_types(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.event_type())
            .collect()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: &DomainEvent) -> Result<(), PublishError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}
