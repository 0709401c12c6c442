//! Shared application state

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::event_handlers::TodoActivityLog;
use crate::application::handlers::build_registry;
use crate::application::pipeline::Mediator;
use crate::domain::events::DomainEvent;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::events::{ChannelSubscriber, InProcessEventBus};
use crate::infrastructure::persistence::InMemoryDatabase;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub database: InMemoryDatabase,
    pub mediator: Mediator,
}

impl AppState {
    /// Wire the store, event bus and handlers together
    ///
    /// Returns the state and the receiving end of the event channel that
    /// mirrors every published event.
    pub fn new(config: AppConfig) -> (Self, mpsc::UnboundedReceiver<DomainEvent>) {
        let database = InMemoryDatabase::new();

        let (channel, events) = ChannelSubscriber::channel();
        let bus = InProcessEventBus::new()
            .subscribe(Arc::new(TodoActivityLog))
            .subscribe(Arc::new(channel));

        let registry = build_registry(Arc::new(database.clone()), Arc::new(bus));
        let mediator = Mediator::new(Arc::new(registry));

        (
            Self {
                config,
                database,
                mediator,
            },
            events,
        )
    }
}
