//! Service layer for business logic and orchestration.
//!
//! This module sits between the repository layer and the HTTP handlers. It
//! contains the availability engine (the read path) and the booking commands
//! (the write path with the overlap-exclusivity contract).

pub mod availability;
pub mod booking;
pub mod error;

pub use availability::{
    compute_available_slots, AvailabilityQuery, EngineConfig, SlotStep,
    DEFAULT_SLOT_STEP_MINUTES, SLOT_STEP_SETTING_KEY,
};
pub use booking::{cancel_booking, create_booking, BookingRequest, Caller};
pub use error::{ServiceError, ServiceResult};
