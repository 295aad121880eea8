// Main library file for the hotel account editor

// Data model, editing sessions and the controller that reconciles them with the hotel service
pub mod client;
pub mod composer;
pub mod config;
pub mod controller;
pub mod draft;
pub mod hotel;
pub mod memory;
pub mod room;
pub mod session;
pub mod snapshot;

// Re-export key types for convenience
pub use client::{ClientError, HotelService, HttpHotelService, ServiceError};
pub use composer::{ComposeError, RoomComposer};
pub use config::ClientConfig;
pub use controller::{
    AccountController, AccountError, AccountView, LogNotifier, Notification, Notifier,
};
pub use draft::{DraftEditor, EditError, FieldChange, HotelDraft, RoomTypes};
pub use hotel::{HotelEnvelope, HotelProfile, RoomRecord};
pub use memory::InMemoryHotelService;
pub use room::{
    BedSize, CoercionPolicy, FieldError, RoomChange, RoomDraft, RoomField, RoomPayload,
    RoomType, ValidationError,
};
pub use session::{SessionError, SessionState};
pub use snapshot::{LoadOutcome, LoadTicket, Snapshot, SnapshotStore};
