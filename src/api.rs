//! Public API surface for the Rust backend.
//!
//! This file consolidates the identifier newtypes and the DTO types shared
//! between the service layer and the HTTP API. All types derive
//! Serialize/Deserialize for JSON serialization.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::define_id_type;

define_id_type!(Uuid, BusinessId);
define_id_type!(Uuid, BookingId);
define_id_type!(Uuid, UserId);
define_id_type!(i64, ServiceId);
define_id_type!(i64, EmployeeId);
define_id_type!(i64, WeeklyScheduleId);
define_id_type!(i64, BlockId);

impl BusinessId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        BusinessId(Uuid::new_v4())
    }
}

impl BookingId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        BookingId(Uuid::new_v4())
    }
}

impl UserId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        UserId(Uuid::new_v4())
    }
}

/// Availability result for one business and one calendar date.
///
/// Field names follow the legacy wire contract of the availability endpoint
/// (`fecha` / `horarios_disponibles`). Start times are local to the business's
/// timezone, ascending and duplicate-free.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityData {
    /// The queried calendar date.
    pub fecha: NaiveDate,
    /// Bookable start times (time-of-day, business-local).
    pub horarios_disponibles: Vec<NaiveTime>,
}
