//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Everything that crosses the broker: the shared event envelope, the error
// taxonomy for event handling, and the outbound publishing seam.
//
// | Submodule   | Description                                            |
// |-------------|--------------------------------------------------------|
// | envelope    | The `DomainEvent` wire format and its codec.           |
// | error       | `EventError`, the taxonomy for event-path failures.    |
// | publisher   | `EventSink` trait and the broker-backed implementation.|
//--------------------------------------------------------------------------------------------------

mod envelope;
mod error;
mod publisher;

pub use envelope::{decode, encode, DomainEvent};
pub use error::EventError;
pub use publisher::{BrokerEventSink, EventSink};
