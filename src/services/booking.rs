//! Booking commands: creation with overlap exclusivity, and cancellation.
//!
//! An availability result is advisory; the invariant that actually prevents
//! double booking lives here: no two occupying bookings may overlap for the
//! same business and employee (business-wide when the business does not allow
//! simultaneous bookings). The check-then-insert is delegated to the
//! repository, which executes it atomically.

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::api::{BookingId, BusinessId, EmployeeId, ServiceId, UserId};
use crate::db::repository::FullRepository;
use crate::models::{Booking, BookingStatus};
use crate::services::availability;
use crate::services::error::{ServiceError, ServiceResult};

/// Explicit caller identity.
///
/// Every command takes the caller as a parameter; there is no ambient
/// "current request user" context anywhere in this crate. Authentication of
/// the identity is the surrounding layer's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: UserId,
    pub display_name: String,
}

/// Request to create a booking.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub business_id: BusinessId,
    pub service_id: ServiceId,
    pub employee_id: Option<EmployeeId>,
    /// Start instant; the end is derived from the service duration.
    pub start: DateTime<Utc>,
    pub client_name: String,
    pub client_phone: String,
    pub client_email: String,
    pub notes: String,
}

/// Create a pending booking for the caller.
///
/// Validates the business and service, enforces the business's minimum lead
/// time, then inserts under the overlap-exclusivity guard. A taken slot
/// surfaces as `Conflict`.
pub async fn create_booking(
    repo: &dyn FullRepository,
    caller: &Caller,
    request: &BookingRequest,
    now: DateTime<Utc>,
) -> ServiceResult<Booking> {
    let business = repo.get_business(request.business_id).await?;
    if !business.active {
        return Err(ServiceError::NotFound(format!(
            "business {} not found",
            request.business_id
        )));
    }

    let service = repo.get_service(request.service_id).await?;
    if service.business_id != business.id || !service.active {
        return Err(ServiceError::NotFound(format!(
            "service {} not offered by business {}",
            request.service_id, business.id
        )));
    }
    if !service.online_bookable {
        return Err(ServiceError::InvalidRequest(format!(
            "service {} cannot be booked online",
            service.id
        )));
    }

    let earliest = now + Duration::minutes(i64::from(business.minimum_lead_time_minutes));
    if request.start <= earliest {
        return Err(ServiceError::InvalidRequest(format!(
            "booking must start at least {} minutes from now",
            business.minimum_lead_time_minutes
        )));
    }

    // Business-wide daily limit for the service, counted on the booking's
    // business-local date.
    if let Some(cap) = service.max_per_day {
        let date = request.start.with_timezone(&business.timezone).date_naive();
        let day_span = availability::local_day_bounds(business.timezone, date)?;
        let taken = repo
            .occupying_bookings(business.id, day_span, None)
            .await?
            .iter()
            .filter(|b| b.service_id == service.id)
            .count() as u32;
        if taken >= cap {
            return Err(ServiceError::Conflict(format!(
                "service {} has reached its daily limit of {}",
                service.id, cap
            )));
        }
    }

    let mut booking = Booking::new(
        BookingId::random(),
        business.id,
        caller.user_id,
        request.employee_id,
        service.id,
        request.start,
        service.duration_minutes,
    );
    booking.client_name = request.client_name.clone();
    booking.client_phone = request.client_phone.clone();
    booking.client_email = request.client_email.clone();
    booking.notes = request.notes.clone();

    let stored = repo
        .insert_booking_checked(booking, !business.allows_multiple_bookings)
        .await?;

    info!(
        booking = %stored.id,
        business = %stored.business_id,
        start = %stored.span.start,
        "booking created"
    );
    Ok(stored)
}

/// Cancel one of the caller's bookings.
///
/// Cancellation is allowed until the business's cancellation window closes
/// (`start - cancellation_window_minutes`). A booking belonging to another
/// caller is reported as `NotFound` rather than revealing its existence.
pub async fn cancel_booking(
    repo: &dyn FullRepository,
    caller: &Caller,
    booking_id: BookingId,
    now: DateTime<Utc>,
) -> ServiceResult<Booking> {
    let booking = repo.get_booking(booking_id).await?;
    if booking.client_id != caller.user_id {
        return Err(ServiceError::NotFound(format!(
            "booking {} not found",
            booking_id
        )));
    }

    if booking.status.is_terminal() {
        return Err(ServiceError::InvalidRequest(format!(
            "booking {} is already closed",
            booking_id
        )));
    }

    let business = repo.get_business(booking.business_id).await?;
    let deadline =
        booking.span.start - Duration::minutes(i64::from(business.cancellation_window_minutes));
    if now > deadline {
        return Err(ServiceError::InvalidRequest(format!(
            "cancellation window of {} minutes has passed",
            business.cancellation_window_minutes
        )));
    }

    let updated = repo
        .update_booking_status(booking_id, BookingStatus::CancelledByClient)
        .await?;
    info!(booking = %updated.id, "booking cancelled by client");
    Ok(updated)
}
