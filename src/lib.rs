// Expose the modules
pub mod api;
pub mod config;
pub mod dispatch;
pub mod events;
pub mod gateway;
pub mod services;
pub mod store;
pub mod types;

// Re-export key types for easier usage
pub use config::{Config, PublishPolicy};
pub use dispatch::{Dispatcher, Disposition, EventConsumer};
pub use events::{decode, encode, BrokerEventSink, DomainEvent, EventError, EventSink};
pub use gateway::Relay;
pub use store::{
    BookingStore, MemoryBookings, MemoryPayments, MemoryRooms, PaymentStore, RoomStore, StoreError,
};
pub use types::{Booking, BookingStatus, Payment, Room};
