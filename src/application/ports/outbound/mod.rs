//! Outbound ports - Interfaces that the application requires from external systems

mod event_port;
mod repository_port;

#[cfg(test)]
pub use event_port::MockEventPublisher;
pub use event_port::{EventPublisher, EventSubscriber, PublishError};
pub use repository_port::{
    PersistenceError, Predicate, Repository, UnitOfWork, UnitOfWorkFactory,
};
