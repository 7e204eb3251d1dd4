//! Repository trait definitions.
//!
//! These traits are the persistence seam of the system: the availability
//! engine consumes exactly the read queries defined here and writes nothing;
//! the booking workflow additionally relies on the conditional-write contract
//! of [`BookingRepository::insert_booking_checked`].
//!
//! # Thread Safety
//! Implementations must be `Send + Sync` to work with async Rust.

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;
use chrono::{NaiveDate, Weekday};

use crate::api::{BookingId, BusinessId, EmployeeId, ServiceId};
use crate::models::{
    Booking, BookingStatus, Business, PlatformSetting, ScheduleBlock, Service, SettingValue,
    TimeRange, WeeklySchedule,
};

/// Repository operations for business records.
#[async_trait]
pub trait BusinessRepository: Send + Sync {
    /// Fetch a business by id.
    ///
    /// # Returns
    /// * `Ok(Business)` - The business record
    /// * `Err(RepositoryError::NotFound)` - If no such business exists
    async fn get_business(&self, id: BusinessId) -> RepositoryResult<Business>;

    /// Store a business record.
    async fn insert_business(&self, business: Business) -> RepositoryResult<()>;
}

/// Repository operations for weekly hours and schedule blocks.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Fetch the active weekly schedule rows for a business and weekday whose
    /// validity range (if any) contains `on_date`.
    ///
    /// Seasonal precedence between the returned rows is the caller's concern;
    /// this query only filters.
    async fn weekly_schedules_for(
        &self,
        business_id: BusinessId,
        weekday: Weekday,
        on_date: NaiveDate,
    ) -> RepositoryResult<Vec<WeeklySchedule>>;

    /// Fetch the active blocks of a business overlapping `range`, restricted
    /// to the given employee scope: business-wide blocks always match,
    /// employee-scoped blocks match only when `employee` names that employee.
    async fn active_blocks_overlapping(
        &self,
        business_id: BusinessId,
        range: TimeRange,
        employee: Option<EmployeeId>,
    ) -> RepositoryResult<Vec<ScheduleBlock>>;

    /// Store a weekly schedule row.
    async fn insert_weekly_schedule(&self, row: WeeklySchedule) -> RepositoryResult<()>;

    /// Store a schedule block.
    async fn insert_block(&self, block: ScheduleBlock) -> RepositoryResult<()>;
}

/// Repository operations for service records.
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    /// Fetch a service by id.
    async fn get_service(&self, id: ServiceId) -> RepositoryResult<Service>;

    /// Store a service record.
    async fn insert_service(&self, service: Service) -> RepositoryResult<()>;
}

/// Repository operations for bookings.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Fetch the occupying bookings (status pending or confirmed) of a
    /// business whose interval overlaps `range`.
    ///
    /// With `employee = None` every booking of the business is considered.
    /// With `employee = Some(e)` the result contains bookings assigned to `e`
    /// plus unassigned bookings, which occupy the business generally.
    async fn occupying_bookings(
        &self,
        business_id: BusinessId,
        range: TimeRange,
        employee: Option<EmployeeId>,
    ) -> RepositoryResult<Vec<Booking>>;

    /// Atomically insert a booking after verifying it does not overlap any
    /// occupying booking in scope.
    ///
    /// This is the check-then-insert that keeps two concurrent clients from
    /// both booking the same slot: the check and the insert happen under one
    /// exclusive critical section (or one serializable transaction in a SQL
    /// backend). The exclusivity scope is the same employee; with
    /// `business_wide_exclusive` the whole business is exclusive regardless
    /// of employee assignment.
    ///
    /// # Returns
    /// * `Ok(Booking)` - The stored booking
    /// * `Err(RepositoryError::Conflict)` - If the interval is already taken
    async fn insert_booking_checked(
        &self,
        booking: Booking,
        business_wide_exclusive: bool,
    ) -> RepositoryResult<Booking>;

    /// Fetch a booking by id.
    async fn get_booking(&self, id: BookingId) -> RepositoryResult<Booking>;

    /// Transition a booking to a new status and return the updated record.
    async fn update_booking_status(
        &self,
        id: BookingId,
        status: BookingStatus,
    ) -> RepositoryResult<Booking>;
}

/// Repository operations for platform settings.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Fetch and decode an active setting. Returns `Ok(None)` when the key is
    /// absent or inactive; a raw value that fails to decode under its declared
    /// type is a validation error.
    async fn get_setting(&self, key: &str) -> RepositoryResult<Option<SettingValue>>;

    /// Insert or replace a setting.
    async fn upsert_setting(&self, setting: PlatformSetting) -> RepositoryResult<()>;
}

/// Combined repository interface used by the service layer and HTTP state.
#[async_trait]
pub trait FullRepository:
    BusinessRepository + ScheduleRepository + ServiceRepository + BookingRepository + SettingsRepository
{
    /// Verify the storage backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;
}
