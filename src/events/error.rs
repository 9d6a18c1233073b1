use thiserror::Error;

/// Errors that can occur along the event path, from decoding an inbound
/// payload to publishing an outbound one. Store failures while applying an
/// event stay `StoreError`: consumers return them directly and the
/// dispatcher maps them to its own disposition.
///
/// The distinction between [`EventError::Malformed`] and
/// [`EventError::Unrouted`] matters for acknowledgement: a malformed payload
/// can never be decoded and is left for redelivery, while an unrouted one is
/// a perfectly valid event this service simply has no handler for, and must
/// be acknowledged so it does not loop forever.
#[derive(Error, Debug)]
pub enum EventError {
    /// The payload is not a decodable event.
    #[error("Malformed event payload: {0}")]
    Malformed(String),

    /// The payload decoded to a type no local handler covers.
    #[error("No handler registered for event type: {0}")]
    Unrouted(String),

    /// Handing the event to the broker failed.
    #[error("Event publish failure: {0}")]
    Publish(#[from] broker::BrokerError),
}
