//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// The three reservation services. Each submodule bundles one service's HTTP
// routes, its shared state, and (where it consumes events) its
// `EventConsumer` implementation.
//
// | Submodule  | Port | Owns            | Publishes   | Consumes     |
// |------------|------|-----------------|-------------|--------------|
// | inventory  | 3001 | rooms           | -           | book         |
// | booking    | 3002 | bookings        | book        | payment      |
// | payment    | 3003 | payments        | payment     | -            |
//--------------------------------------------------------------------------------------------------

pub mod booking;
pub mod inventory;
pub mod payment;

use tracing::warn;

use crate::api::{ApiError, ApiResult};
use crate::config::PublishPolicy;
use crate::events::{DomainEvent, EventSink};

/// Publishes an event after its local write has committed, settling a publish
/// failure per the configured policy. Under [`PublishPolicy::Log`] the caller
/// still gets a success; the committed write is never rolled back.
pub(crate) async fn publish_after_commit(
    events: &dyn EventSink,
    policy: PublishPolicy,
    event: &DomainEvent,
) -> ApiResult<()> {
    match events.publish(event).await {
        Ok(()) => Ok(()),
        Err(err) => match policy {
            PublishPolicy::Log => {
                warn!(
                    event_type = event.event_type(),
                    booking_id = event.booking_id(),
                    error = %err,
                    "Event publish failed after local commit; record stands, event is lost"
                );
                Ok(())
            }
            PublishPolicy::Fail => Err(ApiError::Internal(format!(
                "failed to publish {} event: {}",
                event.event_type(),
                err
            ))),
        },
    }
}
