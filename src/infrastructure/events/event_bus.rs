//! In-process event bus
//!
//! Fans each published event out to the registered subscribers, in
//! registration order. A failing subscriber does not stop delivery to the
//! ones after it; all failures are reported together.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::application::ports::outbound::{EventPublisher, EventSubscriber, PublishError};
use crate::domain::events::DomainEvent;

#[derive(Clone, Default)]
pub struct InProcessEventBus {
    subscribers: Vec<Arc<dyn EventSubscriber>>,
}

impl InProcessEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(mut self, subscriber: Arc<dyn EventSubscriber>) -> Self {
        self.subscribers.push(subscriber);
        self
    }
}

#[async_trait]
impl EventPublisher for InProcessEventBus {
    async fn publish(&self, event: &DomainEvent) -> Result<(), PublishError> {
        debug!(
            event_type = event.event_type(),
            event_id = %event.id(),
            subscribers = self.subscribers.len(),
            "Publishing domain event"
        );

        let mut failures = Vec::new();
        for subscriber in &self.subscribers {
            if let Err(e) = subscriber.handle(event).await {
                warn!(
                    subscriber = subscriber.name(),
                    event_type = event.event_type(),
                    error = %e,
                    "Event subscriber failed"
                );
                failures.push(e);
            }
        }

        match failures.len() {
            0 => Ok(()),
            1 => Err(failures.remove(0)),
            _ => Err(PublishError::Several(failures)),
        }
    }
}

/// Forwards every event to an unbounded channel
pub struct ChannelSubscriber {
    sender: mpsc::UnboundedSender<DomainEvent>,
}

impl ChannelSubscriber {
    pub fn new(sender: mpsc::UnboundedSender<DomainEvent>) -> Self {
        Self { sender }
    }

    /// A subscriber together with the receiving end of its channel
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<DomainEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

#[async_trait]
impl EventSubscriber for ChannelSubscriber {
    fn name(&self) -> &'static str {
        "channel"
    }

    async fn handle(&self, event: &DomainEvent) -> Result<(), PublishError> {
        self.sender
            .send(event.clone())
            .map_err(|_| PublishError::Subscriber {
                subscriber: self.name(),
                reason: "receiver dropped".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::EventMetadata;
    use crate::domain::value_objects::{ProjectId, TodoId};

    fn deleted() -> DomainEvent {
        DomainEvent::TodoDeleted {
            metadata: EventMetadata::default(),
            todo_id: TodoId::new(),
            project_id: ProjectId::new(),
            user_id: "a@b.com".to_string(),
        }
    }

    #[tokio::test]
    async fn delivers_to_every_subscriber_in_order() {
        let (first, mut first_rx) = ChannelSubscriber::channel();
        let (second, mut second_rx) = ChannelSubscriber::channel();
        let bus = InProcessEventBus::new()
            .subscribe(Arc::new(first))
            .subscribe(Arc::new(second));

        let event = deleted();
        bus.publish(&event).await.unwrap();

        assert_eq!(first_rx.recv().await, Some(event.clone()));
        assert_eq!(second_rx.recv().await, Some(event));
    }

    #[tokio::test]
    async fn a_failing_subscriber_does_not_stop_the_rest() {
        let (closed, closed_rx) = ChannelSubscriber::channel();
        drop(closed_rx);
        let (open, mut open_rx) = ChannelSubscriber::channel();
        let bus = InProcessEventBus::new()
            .subscribe(Arc::new(closed))
            .subscribe(Arc::new(open));

        let err = bus.publish(&deleted()).await.unwrap_err();

        assert!(matches!(err, PublishError::Subscriber { subscriber: "channel", .. }));
        assert!(open_rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn without_subscribers_publishing_succeeds() {
        assert!(InProcessEventBus::new().publish(&deleted()).await.is_ok());
    }
}
