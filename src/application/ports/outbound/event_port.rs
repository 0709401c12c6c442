//! Event ports - Publishing committed domain events

use async_trait::async_trait;

use crate::domain::events::DomainEvent;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PublishError {
    #[error("Subscriber {subscriber} failed: {reason}")]
    Subscriber {
        subscriber: &'static str,
        reason: String,
    },

    #[error("{} subscribers failed: {}", .0.len(), join_failures(.0))]
    Several(Vec<PublishError>),
}

fn join_failures(failures: &[PublishError]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Hands committed events to interested parties
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &DomainEvent) -> Result<(), PublishError>;
}

/// Reacts to published events
#[async_trait]
pub trait EventSubscriber: Send + Sync {
    fn name(&self) -> &'static str;

    async fn handle(&self, event: &DomainEvent) -> Result<(), PublishError>;
}
