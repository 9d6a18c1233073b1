//--------------------------------------------------------------------------------------------------
// TEST MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Integration tests for the three service APIs and the event choreography
// between them. The broker is replaced by a recording sink on the publish
// side and direct dispatcher calls on the consume side, so the full flow
// runs in-process.
//--------------------------------------------------------------------------------------------------

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{from_slice, json, Value};
use tower::ServiceExt;

use hotel_reservation::{
    config::PublishPolicy,
    dispatch::{Dispatcher, Disposition},
    encode,
    services::{
        booking::{BookingSettlement, BookingState},
        inventory::{self, InventoryState, RoomSettlement},
        payment::PaymentState,
    },
    store::{BookingStore, MemoryBookings, MemoryPayments, MemoryRooms, PaymentStore, RoomStore},
    DomainEvent, EventError, EventSink,
};

/// Records every published event instead of talking to a broker.
#[derive(Default)]
struct RecordingSink {
    published: Mutex<Vec<DomainEvent>>,
}

impl RecordingSink {
    fn take(&self) -> Vec<DomainEvent> {
        std::mem::take(&mut *self.published.lock().unwrap())
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn publish(&self, event: &DomainEvent) -> Result<(), EventError> {
        self.published.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Sink that always fails, for exercising the publish failure policy.
struct BrokenSink;

#[async_trait]
impl EventSink for BrokenSink {
    async fn publish(&self, _event: &DomainEvent) -> Result<(), EventError> {
        Err(EventError::Malformed("broker unavailable".to_string()))
    }
}

fn booking_router(
    sink: Arc<dyn EventSink>,
    policy: PublishPolicy,
) -> (Router, Arc<MemoryBookings>) {
    let bookings = Arc::new(MemoryBookings::default());
    let state = Arc::new(BookingState {
        bookings: bookings.clone(),
        events: sink,
        publish_policy: policy,
    });
    (hotel_reservation::services::booking::router(state), bookings)
}

fn payment_router(
    sink: Arc<dyn EventSink>,
    policy: PublishPolicy,
) -> (Router, Arc<MemoryPayments>) {
    let payments = Arc::new(MemoryPayments::default());
    let state = Arc::new(PaymentState {
        payments: payments.clone(),
        events: sink,
        publish_policy: policy,
    });
    (hotel_reservation::services::payment::router(state), payments)
}

fn inventory_router(rooms: Arc<MemoryRooms>) -> Router {
    inventory::router(Arc::new(InventoryState { rooms }))
}

async fn post_json(app: &Router, uri: &str, body: Value) -> Response {
    app.clone()
        .oneshot(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Helper to parse JSON responses
async fn parse_json_response(response: Response) -> Value {
    let body_bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    from_slice(&body_bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoints() {
    let (booking, _) = booking_router(Arc::new(RecordingSink::default()), PublishPolicy::Log);
    let (payment, _) = payment_router(Arc::new(RecordingSink::default()), PublishPolicy::Log);
    let inventory = inventory_router(Arc::new(MemoryRooms::default()));

    for app in [&booking, &payment, &inventory] {
        let response = get(app, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_add_room_and_list() {
    let rooms = Arc::new(MemoryRooms::default());
    let app = inventory_router(rooms);

    let response = post_json(
        &app,
        "/add",
        json!({
            "roomId": "201",
            "roomType": "Suite",
            "price": 250.0,
            "availability": true
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_json_response(response).await;
    assert_eq!(body["roomId"], "201");

    let listed = parse_json_response(get(&app, "/list").await).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["roomType"], "Suite");
}

#[tokio::test]
async fn test_add_room_missing_fields_is_rejected() {
    let app = inventory_router(Arc::new(MemoryRooms::default()));

    let response = post_json(&app, "/add", json!({"roomId": "201"})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_json_response(response).await;
    assert_eq!(body["error"]["message"], "Bad request: Missing required fields");
}

#[tokio::test]
async fn test_create_booking_publishes_book_event() {
    let sink = Arc::new(RecordingSink::default());
    let (app, bookings) = booking_router(sink.clone(), PublishPolicy::Log);

    let response = post_json(
        &app,
        "/add",
        json!({"roomId": "101", "customerName": "Alice"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_json_response(response).await;
    let booking_id = body["bookingId"].as_str().unwrap().to_string();
    assert!(!booking_id.is_empty());
    assert_eq!(body["status"], "confirmed");

    // Local row committed
    let rows = bookings.list().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].booking_id, booking_id);

    // Event published after the commit
    let events = sink.take();
    assert_eq!(events.len(), 1);
    match &events[0] {
        DomainEvent::Book {
            booking_id: event_booking,
            room_id,
            customer_name,
            ..
        } => {
            assert_eq!(event_booking, &booking_id);
            assert_eq!(room_id, "101");
            assert_eq!(customer_name, "Alice");
        }
        other => panic!("expected book event, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_booking_missing_fields_is_rejected() {
    let sink = Arc::new(RecordingSink::default());
    let (app, bookings) = booking_router(sink.clone(), PublishPolicy::Log);

    let response = post_json(&app, "/add", json!({"roomId": "101"})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing written, nothing published
    assert!(bookings.list().await.unwrap().is_empty());
    assert!(sink.take().is_empty());
}

#[tokio::test]
async fn test_record_payment_stores_successful_but_publishes_paid() {
    let sink = Arc::new(RecordingSink::default());
    let (app, payments) = payment_router(sink.clone(), PublishPolicy::Log);

    let response = post_json(&app, "/add", json!({"bookingId": "b-1", "amount": 250.0})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_json_response(response).await;
    assert_eq!(body["status"], "successful");

    let rows = payments.list().await.unwrap();
    assert_eq!(rows[0].status, "successful");

    let events = sink.take();
    match &events[0] {
        DomainEvent::Payment { status, amount, .. } => {
            assert_eq!(status, "paid");
            assert_eq!(*amount, 250.0);
        }
        other => panic!("expected payment event, got {other:?}"),
    }
}

#[tokio::test]
async fn test_publish_failure_with_log_policy_still_succeeds() {
    let (app, bookings) = booking_router(Arc::new(BrokenSink), PublishPolicy::Log);

    let response = post_json(
        &app,
        "/add",
        json!({"roomId": "101", "customerName": "Alice"}),
    )
    .await;

    // Caller sees success, local row stands, the event is simply lost.
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(bookings.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_publish_failure_with_fail_policy_returns_500() {
    let (app, bookings) = booking_router(Arc::new(BrokenSink), PublishPolicy::Fail);

    let response = post_json(
        &app,
        "/add",
        json!({"roomId": "101", "customerName": "Alice"}),
    )
    .await;

    // Caller sees the failure but the committed write is not rolled back.
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(bookings.list().await.unwrap().len(), 1);
}

/// Full choreography: booking -> inventory, payment -> booking, with events
/// carried between services exactly as they would travel over the topic.
#[tokio::test]
async fn test_end_to_end_reservation_flow() {
    let booking_sink = Arc::new(RecordingSink::default());
    let (booking_app, bookings) = booking_router(booking_sink.clone(), PublishPolicy::Log);

    let payment_sink = Arc::new(RecordingSink::default());
    let (payment_app, _) = payment_router(payment_sink.clone(), PublishPolicy::Log);

    let rooms = Arc::new(MemoryRooms::default());
    inventory::seed_catalog(rooms.as_ref()).await.unwrap();
    let inventory_app = inventory_router(rooms.clone());

    let inventory_dispatcher =
        Dispatcher::new("inventory", Arc::new(RoomSettlement::new(rooms.clone())));
    let booking_dispatcher = Dispatcher::new(
        "booking",
        Arc::new(BookingSettlement::new(bookings.clone())),
    );

    // Customer books room 101
    let response = post_json(
        &booking_app,
        "/add",
        json!({"roomId": "101", "customerName": "Alice"}),
    )
    .await;
    let booking_id = parse_json_response(response).await["bookingId"]
        .as_str()
        .unwrap()
        .to_string();

    // The book event reaches the inventory service
    let book_event = booking_sink.take().remove(0);
    assert_eq!(
        inventory_dispatcher.dispatch(&encode(&book_event)).await,
        Disposition::Applied
    );
    let listed = parse_json_response(get(&inventory_app, "/list").await).await;
    let room_101 = listed
        .as_array()
        .unwrap()
        .iter()
        .find(|room| room["roomId"] == "101")
        .unwrap();
    assert_eq!(room_101["availability"], false);

    // Customer pays
    post_json(
        &payment_app,
        "/add",
        json!({"bookingId": booking_id, "amount": 100.0}),
    )
    .await;

    // The payment event settles the booking
    let payment_event = payment_sink.take().remove(0);
    assert_eq!(
        booking_dispatcher.dispatch(&encode(&payment_event)).await,
        Disposition::Applied
    );
    let listed = parse_json_response(get(&booking_app, "/list").await).await;
    assert_eq!(listed[0]["status"], "paid");

    // The book event does not concern the booking service's consumer
    assert_eq!(
        booking_dispatcher.dispatch(&encode(&book_event)).await,
        Disposition::Ignored
    );
}

/// A payment event arriving before its booking exists must be absorbed
/// without error, and the late booking stays confirmed rather than paid.
#[tokio::test]
async fn test_out_of_order_payment_is_tolerated() {
    let bookings = Arc::new(MemoryBookings::default());
    let dispatcher = Dispatcher::new(
        "booking",
        Arc::new(BookingSettlement::new(bookings.clone())),
    );

    let payment = DomainEvent::Payment {
        transaction_id: "t-1".to_string(),
        booking_id: "b-early".to_string(),
        amount: 100.0,
        status: "paid".to_string(),
    };

    // Applied as a no-op and acknowledged, so it will not loop forever.
    assert_eq!(
        dispatcher.dispatch(&encode(&payment)).await,
        Disposition::Applied
    );
    assert!(bookings.list().await.unwrap().is_empty());
}

/// Redelivering the same event twice leaves state exactly as after the first
/// delivery.
#[tokio::test]
async fn test_redelivery_is_idempotent_end_to_end() {
    let rooms = Arc::new(MemoryRooms::default());
    inventory::seed_catalog(rooms.as_ref()).await.unwrap();
    let dispatcher = Dispatcher::new("inventory", Arc::new(RoomSettlement::new(rooms.clone())));

    let event = DomainEvent::Book {
        booking_id: "b-1".to_string(),
        room_id: "101".to_string(),
        customer_name: "Alice".to_string(),
        status: hotel_reservation::BookingStatus::Confirmed,
    };

    assert_eq!(dispatcher.dispatch(&encode(&event)).await, Disposition::Applied);
    assert_eq!(dispatcher.dispatch(&encode(&event)).await, Disposition::Applied);

    let listed = rooms.list().await.unwrap();
    assert_eq!(
        listed.iter().filter(|room| !room.availability).count(),
        1
    );
}
