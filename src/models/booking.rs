//! Booking records and their status lifecycle.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{BookingId, BusinessId, EmployeeId, ServiceId, UserId};
use crate::models::interval::TimeRange;

/// Lifecycle state of a booking.
///
/// Only `Pending` and `Confirmed` bookings occupy their time slot; every
/// other state releases it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    CancelledByClient,
    CancelledByBusiness,
    NoShow,
}

impl BookingStatus {
    /// Whether a booking in this state removes its slot from availability.
    pub fn is_occupying(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    /// Whether a booking in this state was cancelled by either party.
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            BookingStatus::CancelledByClient | BookingStatus::CancelledByBusiness
        )
    }

    /// Terminal states admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Completed
                | BookingStatus::CancelledByClient
                | BookingStatus::CancelledByBusiness
                | BookingStatus::NoShow
        )
    }
}

/// An appointment booked by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub business_id: BusinessId,
    pub client_id: UserId,
    pub employee_id: Option<EmployeeId>,
    pub service_id: ServiceId,
    /// Occupied interval, `[start, start + service duration)` in UTC.
    pub span: TimeRange,
    pub status: BookingStatus,
    pub client_name: String,
    pub client_phone: String,
    pub client_email: String,
    pub notes: String,
}

impl Booking {
    /// Build a new pending booking; the end instant is derived from the
    /// service duration.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: BookingId,
        business_id: BusinessId,
        client_id: UserId,
        employee_id: Option<EmployeeId>,
        service_id: ServiceId,
        start: DateTime<Utc>,
        duration_minutes: u32,
    ) -> Self {
        let end = start + Duration::minutes(i64::from(duration_minutes));
        Self {
            id,
            business_id,
            client_id,
            employee_id,
            service_id,
            span: TimeRange::new(start, end),
            status: BookingStatus::Pending,
            client_name: String::new(),
            client_phone: String::new(),
            client_email: String::new(),
            notes: String::new(),
        }
    }

    /// Whether this booking currently occupies its slot.
    pub fn is_occupying(&self) -> bool {
        self.status.is_occupying()
    }
}
