//! End-to-end scenarios for the availability engine against the in-memory
//! repository.
//!
//! The common fixture is a business in Europe/Madrid (UTC+2 in June) open
//! Tuesdays 09:00-18:00 local, offering a 30-minute service. "Now" is pinned
//! to Monday 2025-06-02 10:00 UTC and the queried date is Tuesday 2025-06-03.

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc, Weekday};

use agenda_rust::api::{
    BlockId, BookingId, BusinessId, EmployeeId, ServiceId, UserId, WeeklyScheduleId,
};
use agenda_rust::db::repositories::LocalRepository;
use agenda_rust::db::repository::{
    BookingRepository, BusinessRepository, ScheduleRepository, ServiceRepository,
};
use agenda_rust::models::{
    BlockCategory, Booking, Business, ScheduleBlock, Service, TimeRange, WeeklySchedule,
};
use agenda_rust::services::{
    compute_available_slots, AvailabilityQuery, EngineConfig, ServiceError, SlotStep,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn monday_morning() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap()
}

struct Fixture {
    repo: LocalRepository,
    business_id: BusinessId,
    service_id: ServiceId,
}

impl Fixture {
    async fn new() -> Self {
        let repo = LocalRepository::new();
        let business_id = BusinessId::random();
        repo.insert_business(Business::new(
            business_id,
            "Peluquería Sol",
            chrono_tz::Europe::Madrid,
        ))
        .await
        .unwrap();
        repo.insert_weekly_schedule(WeeklySchedule::year_round(
            WeeklyScheduleId::new(1),
            business_id,
            Weekday::Tue,
            time(9, 0),
            time(18, 0),
        ))
        .await
        .unwrap();
        let service_id = ServiceId::new(1);
        repo.insert_service(Service::new(service_id, business_id, "Corte", 30))
            .await
            .unwrap();
        Fixture {
            repo,
            business_id,
            service_id,
        }
    }

    fn query(&self) -> AvailabilityQuery {
        AvailabilityQuery {
            business_id: self.business_id,
            date: date(2025, 6, 3),
            service_id: Some(self.service_id),
            employee_id: None,
        }
    }

    async fn slots(&self, query: &AvailabilityQuery) -> Vec<NaiveTime> {
        compute_available_slots(&self.repo, query, EngineConfig::default(), monday_morning())
            .await
            .unwrap()
    }
}

#[tokio::test]
async fn test_open_day_yields_full_grid() {
    let fx = Fixture::new().await;
    let slots = fx.slots(&fx.query()).await;

    assert_eq!(slots.len(), 18);
    assert_eq!(slots.first().copied(), Some(time(9, 0)));
    assert_eq!(slots.last().copied(), Some(time(17, 30)));
    assert!(slots.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn test_existing_booking_removes_overlapping_slot() {
    let fx = Fixture::new().await;
    // 08:00 UTC is 10:00 in Madrid.
    let start = Utc.with_ymd_and_hms(2025, 6, 3, 8, 0, 0).unwrap();
    fx.repo
        .insert_booking_checked(
            Booking::new(
                BookingId::random(),
                fx.business_id,
                UserId::random(),
                None,
                fx.service_id,
                start,
                30,
            ),
            true,
        )
        .await
        .unwrap();

    let slots = fx.slots(&fx.query()).await;
    assert_eq!(slots.len(), 17);
    assert!(!slots.contains(&time(10, 0)));
    assert!(slots.contains(&time(9, 30)));
    assert!(slots.contains(&time(10, 30)));
}

#[tokio::test]
async fn test_longer_booking_removes_every_overlapped_slot() {
    let fx = Fixture::new().await;
    // One hour at 10:00-11:00 local removes both half-hour slots under it.
    let start = Utc.with_ymd_and_hms(2025, 6, 3, 8, 0, 0).unwrap();
    fx.repo
        .insert_booking_checked(
            Booking::new(
                BookingId::random(),
                fx.business_id,
                UserId::random(),
                None,
                fx.service_id,
                start,
                60,
            ),
            true,
        )
        .await
        .unwrap();

    let slots = fx.slots(&fx.query()).await;
    assert!(!slots.contains(&time(10, 0)));
    assert!(!slots.contains(&time(10, 30)));
    assert!(slots.contains(&time(11, 0)));
}

#[tokio::test]
async fn test_block_removes_covered_slots() {
    let fx = Fixture::new().await;
    // 10:00-11:00 UTC is 12:00-13:00 in Madrid.
    let span = TimeRange::new(
        Utc.with_ymd_and_hms(2025, 6, 3, 10, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 6, 3, 11, 0, 0).unwrap(),
    );
    fx.repo
        .insert_block(ScheduleBlock::business_wide(
            BlockId::new(1),
            fx.business_id,
            span,
            BlockCategory::Maintenance,
        ))
        .await
        .unwrap();

    let slots = fx.slots(&fx.query()).await;
    assert_eq!(slots.len(), 16);
    assert!(!slots.contains(&time(12, 0)));
    assert!(!slots.contains(&time(12, 30)));
    assert!(slots.contains(&time(11, 30)));
    assert!(slots.contains(&time(13, 0)));
}

#[tokio::test]
async fn test_inactive_block_is_ignored() {
    let fx = Fixture::new().await;
    let span = TimeRange::new(
        Utc.with_ymd_and_hms(2025, 6, 3, 10, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 6, 3, 11, 0, 0).unwrap(),
    );
    let mut block = ScheduleBlock::business_wide(
        BlockId::new(1),
        fx.business_id,
        span,
        BlockCategory::Maintenance,
    );
    block.active = false;
    fx.repo.insert_block(block).await.unwrap();

    let slots = fx.slots(&fx.query()).await;
    assert_eq!(slots.len(), 18);
    assert!(slots.contains(&time(12, 0)));
    assert!(slots.contains(&time(12, 30)));
}

#[tokio::test]
async fn test_employee_block_only_applies_to_that_employee() {
    let fx = Fixture::new().await;
    let employee = EmployeeId::new(7);
    let span = TimeRange::new(
        Utc.with_ymd_and_hms(2025, 6, 3, 10, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 6, 3, 11, 0, 0).unwrap(),
    );
    fx.repo
        .insert_block(ScheduleBlock::for_employee(
            BlockId::new(1),
            fx.business_id,
            employee,
            span,
            BlockCategory::Vacation,
        ))
        .await
        .unwrap();

    // Unscoped query is unaffected.
    let slots = fx.slots(&fx.query()).await;
    assert!(slots.contains(&time(12, 0)));

    // Scoped query loses the covered slots.
    let mut scoped = fx.query();
    scoped.employee_id = Some(employee);
    let slots = fx.slots(&scoped).await;
    assert!(!slots.contains(&time(12, 0)));
    assert!(!slots.contains(&time(12, 30)));
}

#[tokio::test]
async fn test_today_and_past_dates_are_rejected() {
    let fx = Fixture::new().await;

    let mut query = fx.query();
    query.date = date(2025, 6, 2); // business-local today
    let err = compute_available_slots(&fx.repo, &query, EngineConfig::default(), monday_morning())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidRequest(_)));

    query.date = date(2025, 5, 30);
    let err = compute_available_slots(&fx.repo, &query, EngineConfig::default(), monday_morning())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_foreign_service_is_not_found() {
    let fx = Fixture::new().await;
    let other_business = BusinessId::random();
    fx.repo
        .insert_business(Business::new(
            other_business,
            "Otro",
            chrono_tz::Europe::Madrid,
        ))
        .await
        .unwrap();
    let foreign = ServiceId::new(99);
    fx.repo
        .insert_service(Service::new(foreign, other_business, "Masaje", 60))
        .await
        .unwrap();

    let mut query = fx.query();
    query.service_id = Some(foreign);
    let err = compute_available_slots(&fx.repo, &query, EngineConfig::default(), monday_morning())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_closed_day_yields_empty_list() {
    let fx = Fixture::new().await;
    let mut query = fx.query();
    query.date = date(2025, 6, 4); // Wednesday, no schedule row
    let slots = fx.slots(&query).await;
    assert!(slots.is_empty());
}

#[tokio::test]
async fn test_seasonal_hours_override_year_round_hours() {
    let fx = Fixture::new().await;
    // Summer hours Tue 10:00-14:00, June through August.
    fx.repo
        .insert_weekly_schedule(WeeklySchedule::seasonal(
            WeeklyScheduleId::new(2),
            fx.business_id,
            Weekday::Tue,
            time(10, 0),
            time(14, 0),
            date(2025, 6, 1),
            date(2025, 8, 31),
        ))
        .await
        .unwrap();

    let slots = fx.slots(&fx.query()).await;
    assert_eq!(slots.first().copied(), Some(time(10, 0)));
    assert_eq!(slots.last().copied(), Some(time(13, 30)));
    assert_eq!(slots.len(), 8);
}

#[tokio::test]
async fn test_split_shifts_merge_sorted_without_duplicates() {
    let repo = LocalRepository::new();
    let business_id = BusinessId::random();
    repo.insert_business(Business::new(
        business_id,
        "Partido",
        chrono_tz::Europe::Madrid,
    ))
    .await
    .unwrap();
    for (id, open, close) in [(1, time(9, 0), time(13, 0)), (2, time(16, 0), time(20, 0))] {
        repo.insert_weekly_schedule(WeeklySchedule::year_round(
            WeeklyScheduleId::new(id),
            business_id,
            Weekday::Tue,
            open,
            close,
        ))
        .await
        .unwrap();
    }

    let query = AvailabilityQuery {
        business_id,
        date: date(2025, 6, 3),
        service_id: None,
        employee_id: None,
    };
    let slots = compute_available_slots(&repo, &query, EngineConfig::default(), monday_morning())
        .await
        .unwrap();

    // 8 morning slots plus 8 evening slots, no gap entries in between.
    assert_eq!(slots.len(), 16);
    assert!(slots.windows(2).all(|w| w[0] < w[1]));
    assert!(!slots.contains(&time(13, 0)));
    assert!(!slots.contains(&time(15, 30)));
    assert!(slots.contains(&time(16, 0)));
}

#[tokio::test]
async fn test_lead_time_excludes_slots_at_or_before_threshold() {
    let fx = Fixture::new().await;
    // A 24-hour lead time from Monday 10:00 UTC reaches Tuesday 12:00 Madrid
    // time exactly; that slot sits on the threshold and must not be offered.
    let mut business = fx.repo.get_business(fx.business_id).await.unwrap();
    business.minimum_lead_time_minutes = 24 * 60;
    fx.repo.insert_business(business).await.unwrap();

    let slots = fx.slots(&fx.query()).await;
    assert_eq!(slots.first().copied(), Some(time(12, 30)));
    assert_eq!(slots.len(), 11);
}

#[tokio::test]
async fn test_service_duration_step_spaces_slots_by_duration() {
    let repo = LocalRepository::new();
    let business_id = BusinessId::random();
    repo.insert_business(Business::new(
        business_id,
        "Spa",
        chrono_tz::Europe::Madrid,
    ))
    .await
    .unwrap();
    repo.insert_weekly_schedule(WeeklySchedule::year_round(
        WeeklyScheduleId::new(1),
        business_id,
        Weekday::Tue,
        time(9, 0),
        time(12, 0),
    ))
    .await
    .unwrap();
    let service_id = ServiceId::new(1);
    repo.insert_service(Service::new(service_id, business_id, "Masaje", 45))
        .await
        .unwrap();

    let query = AvailabilityQuery {
        business_id,
        date: date(2025, 6, 3),
        service_id: Some(service_id),
        employee_id: None,
    };
    let config = EngineConfig {
        step: SlotStep::ServiceDuration,
    };
    let slots = compute_available_slots(&repo, &query, config, monday_morning())
        .await
        .unwrap();

    assert_eq!(
        slots,
        vec![time(9, 0), time(9, 45), time(10, 30), time(11, 15)]
    );
}

#[tokio::test]
async fn test_daily_cap_exhausts_service_availability() {
    let fx = Fixture::new().await;
    let capped = ServiceId::new(2);
    fx.repo
        .insert_service(
            Service::new(capped, fx.business_id, "Tinte", 30).with_max_per_day(1),
        )
        .await
        .unwrap();
    let start = Utc.with_ymd_and_hms(2025, 6, 3, 8, 0, 0).unwrap();
    fx.repo
        .insert_booking_checked(
            Booking::new(
                BookingId::random(),
                fx.business_id,
                UserId::random(),
                None,
                capped,
                start,
                30,
            ),
            false,
        )
        .await
        .unwrap();

    let mut query = fx.query();
    query.service_id = Some(capped);
    let slots = fx.slots(&query).await;
    assert!(slots.is_empty());

    // The uncapped service still offers the rest of the day.
    let slots = fx.slots(&fx.query()).await;
    assert!(!slots.is_empty());
}

#[tokio::test]
async fn test_daily_cap_counts_bookings_of_every_employee() {
    let fx = Fixture::new().await;
    let capped = ServiceId::new(2);
    fx.repo
        .insert_service(
            Service::new(capped, fx.business_id, "Tinte", 30).with_max_per_day(1),
        )
        .await
        .unwrap();
    // The one allowed booking of the day is assigned to employee 1.
    let start = Utc.with_ymd_and_hms(2025, 6, 3, 8, 0, 0).unwrap();
    fx.repo
        .insert_booking_checked(
            Booking::new(
                BookingId::random(),
                fx.business_id,
                UserId::random(),
                Some(EmployeeId::new(1)),
                capped,
                start,
                30,
            ),
            false,
        )
        .await
        .unwrap();

    // The cap is business-wide: a query scoped to a different employee must
    // not see the service as still available.
    let mut query = fx.query();
    query.service_id = Some(capped);
    query.employee_id = Some(EmployeeId::new(2));
    let slots = fx.slots(&query).await;
    assert!(slots.is_empty());
}
