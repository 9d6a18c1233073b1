use async_trait::async_trait;
use tracing::debug;

use super::envelope::{encode, DomainEvent};
use super::error::EventError;
use crate::config::PublishPolicy;

/// Outbound seam for domain events.
///
/// Handlers and services publish through this trait so tests can swap in a
/// recording fake without a broker. Publishing happens after the local write
/// has committed; implementations must not be consulted to decide whether the
/// write itself succeeds.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn publish(&self, event: &DomainEvent) -> Result<(), EventError>;
}

/// [`EventSink`] that hands events to the shared broker topic.
///
/// Under [`PublishPolicy::Log`] publishing is fire-and-forget: the payload
/// goes to the publisher's background task and transport failures are logged
/// there. Under [`PublishPolicy::Fail`] every publish awaits the broker
/// round-trip, so a transport failure reaches the caller and can become its
/// error response.
pub struct BrokerEventSink {
    publisher: broker::TopicPublisher,
    policy: PublishPolicy,
}

impl BrokerEventSink {
    pub fn new(publisher: broker::TopicPublisher, policy: PublishPolicy) -> Self {
        Self { publisher, policy }
    }

    /// Drains the underlying publisher and closes its channel.
    pub async fn close(self) -> Result<(), EventError> {
        self.publisher.close().await.map_err(EventError::from)
    }
}

#[async_trait]
impl EventSink for BrokerEventSink {
    async fn publish(&self, event: &DomainEvent) -> Result<(), EventError> {
        let body = encode(event);
        match self.policy {
            PublishPolicy::Log => self.publisher.publish(body)?,
            PublishPolicy::Fail => self.publisher.publish_confirmed(body).await?,
        }
        debug!(
            event_type = event.event_type(),
            booking_id = event.booking_id(),
            "Event handed to broker"
        );
        Ok(())
    }
}
