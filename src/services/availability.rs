//! Availability engine: free-slot computation for one business and date.
//!
//! Given a business, a future calendar date and optionally a service, the
//! engine returns the ordered list of bookable start times for that date. It
//! combines four inputs: the weekly operating hours in effect on the date
//! (with seasonal-override precedence), active schedule blocks, occupying
//! bookings, and the business's lead-time configuration.
//!
//! The engine is a pure read path: it issues a handful of repository queries
//! and combines them in memory. "Now" is always threaded in explicitly so the
//! computation is deterministic under test and never depends on the server's
//! local clock or timezone. Every conflict decision is a half-open interval
//! intersection in absolute time; every calendar decision (today, weekday,
//! day bounds) is made in the business's own timezone.
//!
//! A returned slot is advisory: the race between two clients picking the same
//! slot is resolved at booking creation, not here.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::api::{BusinessId, EmployeeId, ServiceId};
use crate::db::repository::FullRepository;
use crate::models::{TimeRange, WeeklySchedule};
use crate::services::error::{ServiceError, ServiceResult};

/// Legacy slot grid: candidates every 30 minutes.
pub const DEFAULT_SLOT_STEP_MINUTES: u32 = 30;

/// Platform setting overriding the default slot grid.
pub const SLOT_STEP_SETTING_KEY: &str = "slot_step_minutes";

/// Policy for stepping between candidate start times inside a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStep {
    /// Fixed grid in minutes, independent of the service booked.
    FixedGrid(u32),
    /// Step by the slot duration itself, so consecutive slots never overlap
    /// for services whose length is not a grid multiple.
    ServiceDuration,
}

impl Default for SlotStep {
    fn default() -> Self {
        SlotStep::FixedGrid(DEFAULT_SLOT_STEP_MINUTES)
    }
}

/// Engine configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub step: SlotStep,
}

impl EngineConfig {
    /// Build the configuration from platform settings, falling back to the
    /// legacy 30-minute grid when the setting is absent or unusable.
    pub async fn from_settings(repo: &dyn FullRepository) -> Self {
        match repo.get_setting(SLOT_STEP_SETTING_KEY).await {
            Ok(Some(value)) => match value.as_integer() {
                Some(minutes) if (1..=1440).contains(&minutes) => Self {
                    step: SlotStep::FixedGrid(minutes as u32),
                },
                _ => {
                    warn!(
                        key = SLOT_STEP_SETTING_KEY,
                        ?value,
                        "ignoring unusable slot step setting"
                    );
                    Self::default()
                }
            },
            Ok(None) => Self::default(),
            Err(e) => {
                warn!(key = SLOT_STEP_SETTING_KEY, error = %e, "cannot read slot step setting");
                Self::default()
            }
        }
    }
}

/// One availability request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityQuery {
    pub business_id: BusinessId,
    /// Calendar date in the business's timezone; must be strictly after the
    /// business-local "today".
    pub date: NaiveDate,
    /// Restrict to a service; its duration becomes the slot duration.
    pub service_id: Option<ServiceId>,
    /// Restrict to an employee; employee-scoped blocks then apply.
    pub employee_id: Option<EmployeeId>,
}

/// Compute the bookable start times for a business on a date.
///
/// Returns business-local times of day, strictly ascending and
/// duplicate-free. An empty result means the business is closed that day (or
/// fully booked); errors follow the service taxonomy: unknown business or
/// foreign/inactive service is `NotFound`, a non-future date is
/// `InvalidRequest`.
pub async fn compute_available_slots(
    repo: &dyn FullRepository,
    query: &AvailabilityQuery,
    config: EngineConfig,
    now: DateTime<Utc>,
) -> ServiceResult<Vec<NaiveTime>> {
    let business = repo.get_business(query.business_id).await?;
    if !business.active {
        return Err(ServiceError::NotFound(format!(
            "business {} not found",
            query.business_id
        )));
    }
    let tz = business.timezone;

    // Judged against the business-local calendar, not the server clock.
    if query.date <= business.local_today(now) {
        return Err(ServiceError::InvalidRequest(format!(
            "date {} is not in the future for timezone {}",
            query.date, tz
        )));
    }

    let service = match query.service_id {
        Some(id) => {
            let service = repo.get_service(id).await?;
            if service.business_id != business.id || !service.active {
                return Err(ServiceError::NotFound(format!(
                    "service {} not offered by business {}",
                    id, business.id
                )));
            }
            if !service.online_bookable {
                return Err(ServiceError::InvalidRequest(format!(
                    "service {} cannot be booked online",
                    id
                )));
            }
            Some(service)
        }
        None => None,
    };

    let slot_minutes = service
        .as_ref()
        .map(|s| s.duration_minutes)
        .unwrap_or(business.default_duration_minutes);
    if slot_minutes == 0 {
        return Err(ServiceError::InvalidRequest(
            "slot duration is zero".to_string(),
        ));
    }

    let windows = select_effective_windows(
        repo.weekly_schedules_for(business.id, query.date.weekday(), query.date)
            .await?,
    );
    if windows.is_empty() {
        debug!(business = %business.id, date = %query.date, "no schedule in effect");
        return Ok(Vec::new());
    }

    let day_span = local_day_bounds(tz, query.date)?;
    let blocks = repo
        .active_blocks_overlapping(business.id, day_span, query.employee_id)
        .await?;
    let bookings = repo
        .occupying_bookings(business.id, day_span, query.employee_id)
        .await?;

    // Per-day cap: once consumed, the service offers nothing for the date.
    // The cap counts every booking of the service regardless of employee
    // assignment, so the count must not use the query's employee scope.
    if let Some(service) = &service {
        if let Some(cap) = service.max_per_day {
            let taken = repo
                .occupying_bookings(business.id, day_span, None)
                .await?
                .iter()
                .filter(|b| b.service_id == service.id)
                .count() as u32;
            if taken >= cap {
                return Ok(Vec::new());
            }
        }
    }

    let step_minutes = match config.step {
        SlotStep::FixedGrid(minutes) => minutes,
        SlotStep::ServiceDuration => slot_minutes,
    };
    let slot = Duration::minutes(i64::from(slot_minutes));
    let earliest_start = now + Duration::minutes(i64::from(business.minimum_lead_time_minutes));

    let mut slots: Vec<NaiveTime> = Vec::new();
    for window in &windows {
        for start_time in candidate_starts(
            query.date,
            window.opens_at,
            window.closes_at,
            step_minutes,
            slot_minutes,
        ) {
            // A local time erased by a DST transition cannot be booked.
            let Some(start) = resolve_local(tz, query.date, start_time) else {
                continue;
            };
            if start <= earliest_start {
                continue;
            }
            let end = start + slot;
            if blocks.iter().any(|b| b.span.overlaps_span(start, end)) {
                continue;
            }
            if bookings.iter().any(|b| b.span.overlaps_span(start, end)) {
                continue;
            }
            slots.push(start_time);
        }
    }

    slots.sort_unstable();
    slots.dedup();
    Ok(slots)
}

/// Apply seasonal-override precedence to the schedule rows matching a date.
///
/// Bounded (seasonal) rows beat unbounded (year-round) rows; among bounded
/// rows the narrowest validity window wins. Rows tied at the winning
/// specificity all contribute, which is how split shifts (a morning row and
/// an evening row) work.
pub(crate) fn select_effective_windows(mut rows: Vec<WeeklySchedule>) -> Vec<WeeklySchedule> {
    let Some(best) = rows.iter().map(|r| r.validity_span_days()).min() else {
        return rows;
    };
    rows.retain(|r| r.validity_span_days() == best);
    rows
}

/// Candidate start times inside `[opens_at, closes_at)`, stepped by
/// `step_minutes`, keeping only starts whose full slot fits before close.
pub(crate) fn candidate_starts(
    date: NaiveDate,
    opens_at: NaiveTime,
    closes_at: NaiveTime,
    step_minutes: u32,
    slot_minutes: u32,
) -> Vec<NaiveTime> {
    if opens_at >= closes_at || step_minutes == 0 {
        return Vec::new();
    }
    let step = Duration::minutes(i64::from(step_minutes));
    let slot = Duration::minutes(i64::from(slot_minutes));
    let close = date.and_time(closes_at);

    let mut out = Vec::new();
    let mut cursor = date.and_time(opens_at);
    while cursor + slot <= close {
        out.push(cursor.time());
        cursor += step;
    }
    out
}

/// Resolve a business-local wall-clock time to a UTC instant.
///
/// Ambiguous local times (DST fall-back) resolve to the earlier offset;
/// nonexistent local times (DST spring-forward) yield `None`.
pub(crate) fn resolve_local(tz: Tz, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// The UTC span covered by a business-local calendar date.
pub(crate) fn local_day_bounds(tz: Tz, date: NaiveDate) -> ServiceResult<TimeRange> {
    let next = date.succ_opt().ok_or_else(|| {
        ServiceError::InvalidRequest(format!("date {} out of supported range", date))
    })?;
    let start = day_start_instant(tz, date)?;
    let end = day_start_instant(tz, next)?;
    Ok(TimeRange::new(start, end))
}

/// First instant of a local calendar date. Skips forward past a DST gap when
/// midnight itself does not exist (e.g. America/Santiago).
fn day_start_instant(tz: Tz, date: NaiveDate) -> ServiceResult<DateTime<Utc>> {
    for offset_minutes in [0i64, 60, 120] {
        let naive = date.and_time(NaiveTime::MIN) + Duration::minutes(offset_minutes);
        if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
            return Ok(dt.with_timezone(&Utc));
        }
    }
    Err(ServiceError::Internal(format!(
        "cannot resolve start of {} in {}",
        date, tz
    )))
}
