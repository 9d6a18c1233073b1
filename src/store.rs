//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Storage contracts for each service's private state, plus the in-memory
// implementations the binaries run with. Every service owns exactly one store;
// nothing reads another service's rows.
//
// Update operations are keyed and unconditional: applying them twice, or for a
// key that does not exist, is a silent no-op. The event dispatcher relies on
// this to tolerate redeliveries and out-of-order arrival.
//--------------------------------------------------------------------------------------------------

use async_trait::async_trait;
use parking_lot::RwLock;
use thiserror::Error;

use crate::types::{Booking, BookingStatus, Payment, Room};

/// Errors surfaced by a storage backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backend failed to execute the operation.
    #[error("Store backend failure: {0}")]
    Backend(String),
}

//--------------------------------------------------------------------------------------------------
//  CONTRACTS
//--------------------------------------------------------------------------------------------------

/// Room catalog owned by the inventory service.
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Inserts a room. Duplicate `room_id`s are appended, not merged.
    async fn insert(&self, room: Room) -> Result<(), StoreError>;

    /// Marks a room unavailable. Idempotent; an unknown `room_id` is a
    /// silent no-op.
    async fn mark_unavailable(&self, room_id: &str) -> Result<(), StoreError>;

    async fn list(&self) -> Result<Vec<Room>, StoreError>;
}

/// Reservations owned by the booking service.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn insert(&self, booking: Booking) -> Result<(), StoreError>;

    /// Moves a booking to `Paid`. Idempotent; an unknown `booking_id` is a
    /// silent no-op.
    async fn mark_paid(&self, booking_id: &str) -> Result<(), StoreError>;

    async fn list(&self) -> Result<Vec<Booking>, StoreError>;
}

/// Transactions owned by the payment service. Records are append-only.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn insert(&self, payment: Payment) -> Result<(), StoreError>;
    async fn list(&self) -> Result<Vec<Payment>, StoreError>;
}

//--------------------------------------------------------------------------------------------------
//  IN-MEMORY IMPLEMENTATIONS
//--------------------------------------------------------------------------------------------------

/// In-memory [`RoomStore`] backed by a `RwLock<Vec<_>>`.
#[derive(Default)]
pub struct MemoryRooms {
    rows: RwLock<Vec<Room>>,
}

#[async_trait]
impl RoomStore for MemoryRooms {
    async fn insert(&self, room: Room) -> Result<(), StoreError> {
        self.rows.write().push(room);
        Ok(())
    }

    async fn mark_unavailable(&self, room_id: &str) -> Result<(), StoreError> {
        for room in self.rows.write().iter_mut() {
            if room.room_id == room_id {
                room.availability = false;
            }
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Room>, StoreError> {
        Ok(self.rows.read().clone())
    }
}

/// In-memory [`BookingStore`].
#[derive(Default)]
pub struct MemoryBookings {
    rows: RwLock<Vec<Booking>>,
}

#[async_trait]
impl BookingStore for MemoryBookings {
    async fn insert(&self, booking: Booking) -> Result<(), StoreError> {
        self.rows.write().push(booking);
        Ok(())
    }

    async fn mark_paid(&self, booking_id: &str) -> Result<(), StoreError> {
        for booking in self.rows.write().iter_mut() {
            if booking.booking_id == booking_id {
                booking.status = BookingStatus::Paid;
            }
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Booking>, StoreError> {
        Ok(self.rows.read().clone())
    }
}

/// In-memory [`PaymentStore`].
#[derive(Default)]
pub struct MemoryPayments {
    rows: RwLock<Vec<Payment>>,
}

#[async_trait]
impl PaymentStore for MemoryPayments {
    async fn insert(&self, payment: Payment) -> Result<(), StoreError> {
        self.rows.write().push(payment);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Payment>, StoreError> {
        Ok(self.rows.read().clone())
    }
}

//--------------------------------------------------------------------------------------------------
//  TESTS
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn room(id: &str) -> Room {
        Room {
            room_id: id.to_string(),
            room_type: "Single".to_string(),
            price: 100.0,
            availability: true,
        }
    }

    fn booking(id: &str) -> Booking {
        Booking {
            booking_id: id.to_string(),
            room_id: "101".to_string(),
            customer_name: "Alice".to_string(),
            status: BookingStatus::Confirmed,
        }
    }

    #[tokio::test]
    async fn test_mark_unavailable_is_idempotent() {
        let store = MemoryRooms::default();
        store.insert(room("101")).await.unwrap();

        store.mark_unavailable("101").await.unwrap();
        store.mark_unavailable("101").await.unwrap();

        let rooms = store.list().await.unwrap();
        assert_eq!(rooms.len(), 1);
        assert!(!rooms[0].availability);
    }

    #[tokio::test]
    async fn test_mark_unavailable_unknown_room_is_noop() {
        let store = MemoryRooms::default();
        store.insert(room("101")).await.unwrap();

        store.mark_unavailable("999").await.unwrap();

        let rooms = store.list().await.unwrap();
        assert!(rooms[0].availability);
    }

    #[tokio::test]
    async fn test_mark_paid_is_idempotent() {
        let store = MemoryBookings::default();
        store.insert(booking("b-1")).await.unwrap();

        store.mark_paid("b-1").await.unwrap();
        store.mark_paid("b-1").await.unwrap();

        let bookings = store.list().await.unwrap();
        assert_eq!(bookings[0].status, BookingStatus::Paid);
    }

    #[tokio::test]
    async fn test_mark_paid_unknown_booking_is_noop() {
        let store = MemoryBookings::default();
        store.mark_paid("b-missing").await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_payments_are_append_only() {
        let store = MemoryPayments::default();
        store
            .insert(Payment {
                transaction_id: "t-1".to_string(),
                booking_id: "b-1".to_string(),
                amount: 100.0,
                status: crate::types::PAYMENT_RECORDED.to_string(),
            })
            .await
            .unwrap();

        let payments = store.list().await.unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].status, "successful");
    }
}
