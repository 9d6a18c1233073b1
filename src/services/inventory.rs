//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Inventory service: owns the room catalog. Rooms are added and listed over
// HTTP; they are sold by reacting to `book` events from the shared topic.
// This service publishes nothing.
//
// | Component       | Description                                          |
// |-----------------|------------------------------------------------------|
// | InventoryState  | Shared state behind the HTTP handlers                |
// | router          | /health, POST /add, GET /list                        |
// | RoomSettlement  | EventConsumer marking booked rooms unavailable       |
// | seed_catalog    | Populates an empty store with the starter catalog    |
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
use serde::Deserialize;
use tracing::info;

use crate::api::{self, ApiError, ApiResult};
use crate::dispatch::EventConsumer;
use crate::events::DomainEvent;
use crate::store::{RoomStore, StoreError};
use crate::types::Room;

/// Shared state behind the inventory handlers
pub struct InventoryState {
    pub rooms: Arc<dyn RoomStore>,
}

/// Request body for POST /add. Every field is optional so that missing ones
/// produce a 400 instead of a deserialization error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRoomRequest {
    pub room_id: Option<String>,
    pub room_type: Option<String>,
    pub price: Option<f64>,
    pub availability: Option<bool>,
}

/// Creates the inventory routes
pub fn router(state: Arc<InventoryState>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/add", post(add_room))
        .route("/list", get(list_rooms))
        .layer(Extension(state))
}

/// Add a room to the catalog
async fn add_room(
    Extension(state): Extension<Arc<InventoryState>>,
    Json(req): Json<AddRoomRequest>,
) -> ApiResult<Response> {
    let (Some(room_id), Some(room_type), Some(price), Some(availability)) =
        (req.room_id, req.room_type, req.price, req.availability)
    else {
        return Err(ApiError::BadRequest("Missing required fields".to_string()));
    };

    let room = Room {
        room_id,
        room_type,
        price,
        availability,
    };
    state.rooms.insert(room.clone()).await?;

    Ok((StatusCode::OK, Json(room)).into_response())
}

/// List the full catalog
async fn list_rooms(Extension(state): Extension<Arc<InventoryState>>) -> ApiResult<Response> {
    let rooms = state.rooms.list().await?;
    Ok(Json(rooms).into_response())
}

/// Reacts to `book` events: the booked room becomes unavailable.
///
/// The booking may reference a room this catalog has never heard of; the
/// store treats that as a no-op and the event is still acknowledged.
pub struct RoomSettlement {
    rooms: Arc<dyn RoomStore>,
}

impl RoomSettlement {
    pub fn new(rooms: Arc<dyn RoomStore>) -> Self {
        Self { rooms }
    }
}

#[async_trait]
impl EventConsumer for RoomSettlement {
    fn wants(&self, event: &DomainEvent) -> bool {
        matches!(event, DomainEvent::Book { .. })
    }

    async fn apply(&self, event: &DomainEvent) -> Result<(), StoreError> {
        if let DomainEvent::Book {
            room_id,
            booking_id,
            ..
        } = event
        {
            info!(room_id, booking_id, "Marking room unavailable");
            self.rooms.mark_unavailable(room_id).await?;
        }
        Ok(())
    }
}

/// Populates an empty store with the starter catalog. A store that already
/// holds rooms is left untouched, so restarts do not duplicate the seed.
pub async fn seed_catalog(rooms: &dyn RoomStore) -> Result<(), StoreError> {
    if !rooms.list().await?.is_empty() {
        return Ok(());
    }
    for room in starter_catalog() {
        rooms.insert(room).await?;
    }
    info!("Seeded starter room catalog");
    Ok(())
}

/// The twenty rooms every fresh deployment starts with.
fn starter_catalog() -> Vec<Room> {
    let rooms = [
        ("101", "Single", 100.0),
        ("102", "Double", 150.0),
        ("103", "Suite", 250.0),
        ("104", "Single", 120.0),
        ("105", "Deluxe", 300.0),
        ("106", "Single", 110.0),
        ("107", "Double", 160.0),
        ("108", "Suite", 270.0),
        ("109", "Single", 130.0),
        ("110", "Deluxe", 320.0),
        ("111", "Single", 105.0),
        ("112", "Double", 155.0),
        ("113", "Suite", 260.0),
        ("114", "Single", 115.0),
        ("115", "Deluxe", 310.0),
        ("116", "Single", 125.0),
        ("117", "Double", 165.0),
        ("118", "Suite", 280.0),
        ("119", "Single", 135.0),
        ("120", "Deluxe", 350.0),
    ];

    rooms
        .into_iter()
        .map(|(room_id, room_type, price)| Room {
            room_id: room_id.to_string(),
            room_type: room_type.to_string(),
            price,
            availability: true,
        })
        .collect()
}
