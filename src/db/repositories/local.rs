//! In-memory repository implementation.
//!
//! Backs development and testing. All state lives behind a single
//! `parking_lot::RwLock`; write operations therefore execute as one critical
//! section, which is what makes [`insert_booking_checked`] an atomic
//! check-then-insert.
//!
//! [`insert_booking_checked`]: crate::db::repository::BookingRepository::insert_booking_checked

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Weekday};
use parking_lot::RwLock;

use crate::api::{BookingId, BusinessId, EmployeeId, ServiceId};
use crate::db::repository::{
    BookingRepository, BusinessRepository, ErrorContext, FullRepository, RepositoryError,
    RepositoryResult, ScheduleRepository, ServiceRepository, SettingsRepository,
};
use crate::models::{
    Booking, BookingStatus, Business, PlatformSetting, ScheduleBlock, Service, SettingValue,
    TimeRange, WeeklySchedule,
};

#[derive(Debug, Default)]
struct Store {
    businesses: HashMap<BusinessId, Business>,
    schedules: Vec<WeeklySchedule>,
    blocks: Vec<ScheduleBlock>,
    services: HashMap<ServiceId, Service>,
    bookings: HashMap<BookingId, Booking>,
    settings: HashMap<String, PlatformSetting>,
}

/// In-memory repository for unit testing and local development.
#[derive(Debug, Default)]
pub struct LocalRepository {
    store: RwLock<Store>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BusinessRepository for LocalRepository {
    async fn get_business(&self, id: BusinessId) -> RepositoryResult<Business> {
        self.store.read().businesses.get(&id).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("business {} not found", id),
                ErrorContext::new("get_business")
                    .with_entity("business")
                    .with_entity_id(id),
            )
        })
    }

    async fn insert_business(&self, business: Business) -> RepositoryResult<()> {
        self.store.write().businesses.insert(business.id, business);
        Ok(())
    }
}

#[async_trait]
impl ScheduleRepository for LocalRepository {
    async fn weekly_schedules_for(
        &self,
        business_id: BusinessId,
        weekday: Weekday,
        on_date: NaiveDate,
    ) -> RepositoryResult<Vec<WeeklySchedule>> {
        let store = self.store.read();
        Ok(store
            .schedules
            .iter()
            .filter(|row| {
                row.business_id == business_id
                    && row.weekday == weekday
                    && row.is_in_effect_on(on_date)
            })
            .cloned()
            .collect())
    }

    async fn active_blocks_overlapping(
        &self,
        business_id: BusinessId,
        range: TimeRange,
        employee: Option<EmployeeId>,
    ) -> RepositoryResult<Vec<ScheduleBlock>> {
        let store = self.store.read();
        Ok(store
            .blocks
            .iter()
            .filter(|block| {
                block.business_id == business_id
                    && block.active
                    && block.span.overlaps(&range)
                    && block.applies_to(employee)
            })
            .cloned()
            .collect())
    }

    async fn insert_weekly_schedule(&self, row: WeeklySchedule) -> RepositoryResult<()> {
        self.store.write().schedules.push(row);
        Ok(())
    }

    async fn insert_block(&self, block: ScheduleBlock) -> RepositoryResult<()> {
        self.store.write().blocks.push(block);
        Ok(())
    }
}

#[async_trait]
impl ServiceRepository for LocalRepository {
    async fn get_service(&self, id: ServiceId) -> RepositoryResult<Service> {
        self.store.read().services.get(&id).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("service {} not found", id),
                ErrorContext::new("get_service")
                    .with_entity("service")
                    .with_entity_id(id),
            )
        })
    }

    async fn insert_service(&self, service: Service) -> RepositoryResult<()> {
        self.store.write().services.insert(service.id, service);
        Ok(())
    }
}

/// Whether `existing` bars `candidate` from being inserted.
fn bookings_conflict(existing: &Booking, candidate: &Booking, business_wide: bool) -> bool {
    existing.business_id == candidate.business_id
        && existing.is_occupying()
        && existing.span.overlaps(&candidate.span)
        && (business_wide || existing.employee_id == candidate.employee_id)
}

#[async_trait]
impl BookingRepository for LocalRepository {
    async fn occupying_bookings(
        &self,
        business_id: BusinessId,
        range: TimeRange,
        employee: Option<EmployeeId>,
    ) -> RepositoryResult<Vec<Booking>> {
        let store = self.store.read();
        Ok(store
            .bookings
            .values()
            .filter(|booking| {
                booking.business_id == business_id
                    && booking.is_occupying()
                    && booking.span.overlaps(&range)
                    && match employee {
                        None => true,
                        // Unassigned bookings occupy the business generally.
                        Some(e) => {
                            booking.employee_id.is_none() || booking.employee_id == Some(e)
                        }
                    }
            })
            .cloned()
            .collect())
    }

    async fn insert_booking_checked(
        &self,
        booking: Booking,
        business_wide_exclusive: bool,
    ) -> RepositoryResult<Booking> {
        // Single write lock: the overlap check and the insert are atomic.
        let mut store = self.store.write();

        if store.bookings.contains_key(&booking.id) {
            return Err(RepositoryError::validation_with_context(
                format!("booking {} already exists", booking.id),
                ErrorContext::new("insert_booking_checked")
                    .with_entity("booking")
                    .with_entity_id(booking.id),
            ));
        }

        if let Some(existing) = store
            .bookings
            .values()
            .find(|existing| bookings_conflict(existing, &booking, business_wide_exclusive))
        {
            return Err(RepositoryError::conflict_with_context(
                format!(
                    "interval [{}, {}) already occupied by booking {}",
                    booking.span.start, booking.span.end, existing.id
                ),
                ErrorContext::new("insert_booking_checked")
                    .with_entity("booking")
                    .with_entity_id(booking.id),
            ));
        }

        store.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn get_booking(&self, id: BookingId) -> RepositoryResult<Booking> {
        self.store.read().bookings.get(&id).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("booking {} not found", id),
                ErrorContext::new("get_booking")
                    .with_entity("booking")
                    .with_entity_id(id),
            )
        })
    }

    async fn update_booking_status(
        &self,
        id: BookingId,
        status: BookingStatus,
    ) -> RepositoryResult<Booking> {
        let mut store = self.store.write();
        let booking = store.bookings.get_mut(&id).ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("booking {} not found", id),
                ErrorContext::new("update_booking_status")
                    .with_entity("booking")
                    .with_entity_id(id),
            )
        })?;
        booking.status = status;
        Ok(booking.clone())
    }
}

#[async_trait]
impl SettingsRepository for LocalRepository {
    async fn get_setting(&self, key: &str) -> RepositoryResult<Option<SettingValue>> {
        let store = self.store.read();
        match store.settings.get(key) {
            Some(setting) if setting.active => setting.value().map(Some).map_err(|e| {
                RepositoryError::validation_with_context(
                    e.to_string(),
                    ErrorContext::new("get_setting")
                        .with_entity("platform_setting")
                        .with_entity_id(key),
                )
            }),
            _ => Ok(None),
        }
    }

    async fn upsert_setting(&self, setting: PlatformSetting) -> RepositoryResult<()> {
        self.store
            .write()
            .settings
            .insert(setting.key.clone(), setting);
        Ok(())
    }
}

#[async_trait]
impl FullRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}
