//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// The wire format every service speaks. A single JSON object with a `type`
// discriminator travels on the shared fanout topic; each service decodes it
// and decides locally whether it cares.
//
// | Section  | Description                                            |
// |----------|--------------------------------------------------------|
// | TYPES    | The `DomainEvent` envelope.                            |
// | CODEC    | `encode` / `decode`, with the ack-relevant error split.|
// | TESTS    | Wire-format fixtures and decode edge cases.            |
//--------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::EventError;
use crate::types::BookingStatus;

//--------------------------------------------------------------------------------------------------
//  TYPES
//--------------------------------------------------------------------------------------------------

/// All events that travel between services.
///
/// Serializes to a flat JSON object with a lowercase `type` field and
/// camelCase attributes, e.g.
/// `{"type":"book","bookingId":"...","roomId":"101","customerName":"Alice","status":"confirmed"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DomainEvent {
    /// A reservation was created by the booking service.
    #[serde(rename_all = "camelCase")]
    Book {
        booking_id: String,
        room_id: String,
        customer_name: String,
        status: BookingStatus,
    },
    /// A payment was recorded by the payment service.
    #[serde(rename_all = "camelCase")]
    Payment {
        transaction_id: String,
        booking_id: String,
        amount: f64,
        status: String,
    },
}

impl DomainEvent {
    /// The wire value of the `type` discriminator.
    pub fn event_type(&self) -> &'static str {
        match self {
            DomainEvent::Book { .. } => "book",
            DomainEvent::Payment { .. } => "payment",
        }
    }

    /// The booking this event is about. Every event type carries one; it is
    /// the correlation key of the whole choreography.
    pub fn booking_id(&self) -> &str {
        match self {
            DomainEvent::Book { booking_id, .. } => booking_id,
            DomainEvent::Payment { booking_id, .. } => booking_id,
        }
    }
}

//--------------------------------------------------------------------------------------------------
//  CODEC
//--------------------------------------------------------------------------------------------------

/// Serializes an event for publication.
pub fn encode(event: &DomainEvent) -> Vec<u8> {
    // Safe to unwrap: the envelope contains only string and number fields,
    // which always serialize.
    serde_json::to_vec(event).unwrap()
}

/// Decodes an inbound payload into a [`DomainEvent`].
///
/// Distinguishes two failure shapes the dispatcher treats differently:
/// payloads that are not valid events at all ([`EventError::Malformed`]) and
/// valid events of a type this crate does not know ([`EventError::Unrouted`]).
pub fn decode(payload: &[u8]) -> Result<DomainEvent, EventError> {
    let value: Value =
        serde_json::from_slice(payload).map_err(|err| EventError::Malformed(err.to_string()))?;

    let event_type = match value.get("type").and_then(Value::as_str) {
        Some(event_type) => event_type.to_owned(),
        None => {
            return Err(EventError::Malformed(
                "missing or non-string \"type\" field".to_string(),
            ));
        }
    };

    match event_type.as_str() {
        "book" | "payment" => {
            serde_json::from_value(value).map_err(|err| EventError::Malformed(err.to_string()))
        }
        _ => Err(EventError::Unrouted(event_type)),
    }
}

//--------------------------------------------------------------------------------------------------
//  TESTS
//--------------------------------------------------------------------------------------------------
