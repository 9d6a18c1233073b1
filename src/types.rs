//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module defines the core data types shared by the reservation services:
// rooms, bookings, payments, and their status enums.
//
// | Section            | Description                                                      |
// |--------------------|------------------------------------------------------------------|
// | ENUMS              | Defines discrete sets of values (BookingStatus).                 |
// | STRUCTS            | Defines the structure of Rooms, Bookings and Payments.           |
// | TESTS              | Contains unit tests for the defined types.                       |
//--------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

//--------------------------------------------------------------------------------------------------
//  ENUMS
//--------------------------------------------------------------------------------------------------

/// Lifecycle status of a booking.
///
/// The transition is one-way: a booking is created `Confirmed` by the booking
/// service and moves to `Paid` when a payment event referencing it is applied.
/// Nothing moves it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Created and awaiting payment.
    Confirmed,
    /// A payment for this booking has been applied.
    Paid,
}

/// Status a payment record carries locally in the payment service.
pub const PAYMENT_RECORDED: &str = "successful";

/// Status the `payment` event carries on the wire.
pub const PAYMENT_SETTLED: &str = "paid";

//--------------------------------------------------------------------------------------------------
//  STRUCTS
//--------------------------------------------------------------------------------------------------
// | Name          | Description                                   |
// |---------------|-----------------------------------------------|
// | Room          | A room in the inventory catalog.              |
// | Booking       | A reservation owned by the booking service.   |
// | Payment       | A recorded payment transaction.               |
//--------------------------------------------------------------------------------------------------

/// A room in the inventory catalog.
///
/// `availability` only ever transitions true -> false; there is no
/// cancellation flow that releases a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Business key for the room, e.g. "101". Not a generated id.
    pub room_id: String,
    /// Free-form category label ("Single", "Double", "Suite", "Deluxe").
    pub room_type: String,
    /// Nightly price.
    pub price: f64,
    /// Whether the room can still be booked.
    pub availability: bool,
}

/// A reservation owned by the booking service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Generated UUID identifying the reservation across services.
    pub booking_id: String,
    /// Room the customer asked for. Not validated against the catalog.
    pub room_id: String,
    pub customer_name: String,
    pub status: BookingStatus,
}

/// A payment transaction, immutable once recorded.
///
/// The status is an opaque string rather than an enum: the payment service
/// stores [`PAYMENT_RECORDED`] locally but puts [`PAYMENT_SETTLED`] on the
/// wire, and both spellings must survive serialization unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Generated UUID identifying the transaction.
    pub transaction_id: String,
    /// Booking this payment settles.
    pub booking_id: String,
    pub amount: f64,
    pub status: String,
}

//--------------------------------------------------------------------------------------------------
//  TESTS
//--------------------------------------------------------------------------------------------------
