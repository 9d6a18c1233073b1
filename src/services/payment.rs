//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Payment service: owns transactions. Recording one writes an append-only
// local row, then publishes a `payment` event. The record stores
// `successful` while the event carries `paid`; both spellings are
// load-bearing for their respective readers. This service consumes nothing.
//
// | Component      | Description                               |
// |----------------|-------------------------------------------|
// | PaymentState   | Shared state behind the HTTP handlers     |
// | router         | /health, POST /add, GET /list             |
//--------------------------------------------------------------------------------------------------

use std::sync::Arc;

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
use crate::events::{DomainEvent, EventSink};
use crate::store::PaymentStore;
use crate::types::{Payment, PAYMENT_RECORDED, PAYMENT_SETTLED};

/// Shared state behind the payment handlers
pub struct PaymentState {
    pub payments: Arc<dyn PaymentStore>,
    pub events: Arc<dyn EventSink>,
    pub publish_policy: PublishPolicy,
}

/// Request body for POST /add. Optional fields so missing ones map to a 400.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentRequest {
    pub booking_id: Option<String>,
    pub amount: Option<f64>,
}

/// Response body for POST /add
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentResponse {
    pub transaction_id: String,
    pub status: String,
}

/// Creates the payment routes
pub fn router(state: Arc<PaymentState>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/add", post(record_payment))
        .route("/list", get(list_payments))
        .layer(Extension(state))
}

/// Record a payment
///
/// No check that the booking exists or that the amount matches a price; this
/// service trusts its callers and the booking service settles on delivery.
async fn record_payment(
    Extension(state): Extension<Arc<PaymentState>>,
    Json(req): Json<RecordPaymentRequest>,
) -> ApiResult<Response> {
    let (Some(booking_id), Some(amount)) = (req.booking_id, req.amount) else {
        return Err(ApiError::BadRequest("Missing required fields".to_string()));
    };

    let transaction_id = Uuid::new_v4().to_string();
    let payment = Payment {
        transaction_id: transaction_id.clone(),
        booking_id: booking_id.clone(),
        amount,
        status: PAYMENT_RECORDED.to_string(),
    };
    state.payments.insert(payment).await?;
    info!(transaction_id, booking_id, amount, "Payment recorded");

    let event = DomainEvent::Payment {
        transaction_id: transaction_id.clone(),
        booking_id,
        amount,
        status: PAYMENT_SETTLED.to_string(),
    };
    publish_after_commit(state.events.as_ref(), state.publish_policy, &event).await?;

    let response = RecordPaymentResponse {
        transaction_id,
        status: PAYMENT_RECORDED.to_string(),
    };
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// List all transactions
async fn list_payments(Extension(state): Extension<Arc<PaymentState>>) -> ApiResult<Response> {
    let payments = state.payments.list().await?;
    Ok(Json(payments).into_response())
}
