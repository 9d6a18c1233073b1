//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Booking service: owns reservations. Creating one writes a `Confirmed` row
// locally, then publishes a `book` event. The service consumes `payment`
// events to move reservations to `Paid`.
//
// | Component          | Description                                       |
// |--------------------|---------------------------------------------------|
// | BookingState       | Shared state behind the HTTP handlers             |
// | router             | /health, POST /add, GET /list                     |
// | BookingSettlement  | EventConsumer settling bookings on payment        |
//--------------------------------------------------------------------------------------------------

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::publish_after_commit;
use crate::api::{self, ApiError, ApiResult};
use crate::config::PublishPolicy;
use crate::dispatch::EventConsumer;
use crate::events::{DomainEvent, EventSink};
use crate::store::{BookingStore, StoreError};
use crate::types::{Booking, BookingStatus};

/// Shared state behind the booking handlers
pub struct BookingState {
    pub bookings: Arc<dyn BookingStore>,
    pub events: Arc<dyn EventSink>,
    pub publish_policy: PublishPolicy,
}

/// Request body for POST /add. Optional fields so missing ones map to a 400.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub room_id: Option<String>,
    pub customer_name: Option<String>,
}

/// Response body for POST /add
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingResponse {
    pub booking_id: String,
    pub status: BookingStatus,
}

/// Creates the booking routes
pub fn router(state: Arc<BookingState>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/add", post(add_booking))
        .route("/list", get(list_bookings))
        .layer(Extension(state))
}

/// Create a reservation
///
/// The local insert commits before the event is published; the HTTP response
/// reflects this service's own state, never the event round-trip. The room id
/// is taken at face value, the catalog is not consulted.
async fn add_booking(
    Extension(state): Extension<Arc<BookingState>>,
    Json(req): Json<CreateBookingRequest>,
) -> ApiResult<Response> {
    let (Some(room_id), Some(customer_name)) = (req.room_id, req.customer_name) else {
        return Err(ApiError::BadRequest("Missing required fields".to_string()));
    };

    let booking_id = Uuid::new_v4().to_string();
    let booking = Booking {
        booking_id: booking_id.clone(),
        room_id: room_id.clone(),
        customer_name: customer_name.clone(),
        status: BookingStatus::Confirmed,
    };
    state.bookings.insert(booking).await?;
    info!(booking_id, room_id, "Booking confirmed");

    let event = DomainEvent::Book {
        booking_id: booking_id.clone(),
        room_id,
        customer_name,
        status: BookingStatus::Confirmed,
    };
    publish_after_commit(state.events.as_ref(), state.publish_policy, &event).await?;

    let response = CreateBookingResponse {
        booking_id,
        status: BookingStatus::Confirmed,
    };
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// List all reservations
async fn list_bookings(Extension(state): Extension<Arc<BookingState>>) -> ApiResult<Response> {
    let bookings = state.bookings.list().await?;
    Ok(Json(bookings).into_response())
}

/// Reacts to `payment` events: the referenced booking moves to `Paid`.
///
/// A payment for a booking this store has never seen is applied as a no-op
/// and acknowledged; the payment may simply have arrived before the booking
/// row was replicated here, or reference a foreign booking.
pub struct BookingSettlement {
    bookings: Arc<dyn BookingStore>,
}

impl BookingSettlement {
    pub fn new(bookings: Arc<dyn BookingStore>) -> Self {
        Self { bookings }
    }
}

#[async_trait]
impl EventConsumer for BookingSettlement {
    fn wants(&self, event: &DomainEvent) -> bool {
        matches!(event, DomainEvent::Payment { .. })
    }

    async fn apply(&self, event: &DomainEvent) -> Result<(), StoreError> {
        if let DomainEvent::Payment {
            booking_id,
            transaction_id,
            ..
        } = event
        {
            info!(booking_id, transaction_id, "Settling booking as paid");
            self.bookings.mark_paid(booking_id).await?;
        }
        Ok(())
    }
}
