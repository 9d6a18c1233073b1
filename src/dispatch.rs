//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Inbound event handling shared by every service. A `Dispatcher` pulls raw
// deliveries off a broker subscription, decodes them, routes them through the
// service's `EventConsumer`, and settles the ack contract:
//
//   decoded + wanted + applied  -> ack
//   decoded + not wanted        -> ack (progress without mutation)
//   undecodable                 -> no ack, broker redelivers
//   store failure               -> no ack, broker redelivers
//
// The decision logic lives in `dispatch`, which takes bytes and returns a
// `Disposition`, so it is testable without a broker.
//--------------------------------------------------------------------------------------------------

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::events::{decode, DomainEvent, EventError};
use crate::store::StoreError;

/// A service's interest set and its local reaction to events.
#[async_trait]
pub trait EventConsumer: Send + Sync {
    /// Whether this service reacts to the event. Events it does not want are
    /// still acknowledged.
    fn wants(&self, event: &DomainEvent) -> bool;

    /// Applies the event to local state. Must be idempotent: the broker is
    /// at-least-once, so redeliveries reach this method unchanged.
    async fn apply(&self, event: &DomainEvent) -> Result<(), StoreError>;
}

/// Outcome of handling a single delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Decoded, wanted, and applied to local state.
    Applied,
    /// Decoded but outside this service's interest set.
    Ignored,
    /// The payload could not be decoded.
    ParseFailed,
    /// The local mutation failed.
    StoreFailed,
}

impl Disposition {
    /// Whether the delivery should be acknowledged. Failed deliveries stay
    /// unacked so the broker redelivers them.
    pub fn should_ack(self) -> bool {
        matches!(self, Disposition::Applied | Disposition::Ignored)
    }
}

/// Drives one service's consumption of the shared topic.
pub struct Dispatcher {
    service: &'static str,
    consumer: Arc<dyn EventConsumer>,
}

impl Dispatcher {
    pub fn new(service: &'static str, consumer: Arc<dyn EventConsumer>) -> Self {
        Self { service, consumer }
    }

    /// Decides the fate of one payload. Never panics and never returns early
    /// out of the consume loop: a poison message must not take the service
    /// down.
    pub async fn dispatch(&self, payload: &[u8]) -> Disposition {
        let event = match decode(payload) {
            Ok(event) => event,
            Err(EventError::Unrouted(event_type)) => {
                debug!(
                    service = self.service,
                    event_type, "No handler for event type, acknowledging"
                );
                return Disposition::Ignored;
            }
            Err(err) => {
                warn!(
                    service = self.service,
                    error = %err,
                    "Undecodable payload left unacknowledged"
                );
                return Disposition::ParseFailed;
            }
        };

        if !self.consumer.wants(&event) {
            debug!(
                service = self.service,
                event_type = event.event_type(),
                "Event outside interest set, acknowledging"
            );
            return Disposition::Ignored;
        }

        match self.consumer.apply(&event).await {
            Ok(()) => {
                debug!(
                    service = self.service,
                    event_type = event.event_type(),
                    booking_id = event.booking_id(),
                    "Event applied"
                );
                Disposition::Applied
            }
            Err(err) => {
                error!(
                    service = self.service,
                    event_type = event.event_type(),
                    error = %err,
                    "Store failure, delivery left unacknowledged"
                );
                Disposition::StoreFailed
            }
        }
    }

    /// Consume loop: runs until the subscription channel closes.
    pub async fn run(&self, mut subscription: broker::Subscription) {
        info!(service = self.service, "Dispatcher started");
        while let Some(delivery) = subscription.receive().await {
            let disposition = self.dispatch(delivery.body()).await;
            if disposition.should_ack() {
                if let Err(err) = subscription.ack(&delivery).await {
                    error!(
                        service = self.service,
                        error = %err,
                        "Failed to acknowledge delivery"
                    );
                }
            }
        }
        warn!(service = self.service, "Subscription closed, dispatcher stopping");
    }
}

//--------------------------------------------------------------------------------------------------
//  TESTS
//--------------------------------------------------------------------------------------------------
