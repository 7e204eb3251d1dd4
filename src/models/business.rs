//! Business records and per-business booking configuration.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::api::BusinessId;

/// Default minimum notice before a bookable slot, in minutes.
pub const DEFAULT_MINIMUM_LEAD_TIME_MINUTES: u32 = 60;

/// Default limit for penalty-free cancellation, in minutes before the booking.
pub const DEFAULT_CANCELLATION_WINDOW_MINUTES: u32 = 120;

/// Default appointment duration when no service is selected, in minutes.
pub const DEFAULT_APPOINTMENT_DURATION_MINUTES: u32 = 30;

/// A business subscribed to the platform.
///
/// Only the fields the scheduling core and the booking workflow read are
/// modeled here; contact details, media and subscription/billing state live in
/// the surrounding CRUD layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub id: BusinessId,
    pub name: String,
    /// IANA timezone all wall-clock decisions for this business are made in.
    pub timezone: Tz,
    /// Minimum notice between "now" and a bookable slot's start.
    pub minimum_lead_time_minutes: u32,
    /// How long before the start a client may still cancel without penalty.
    pub cancellation_window_minutes: u32,
    /// Whether overlapping bookings for different staff members are accepted.
    pub allows_multiple_bookings: bool,
    /// Appointment duration used when no service is given.
    pub default_duration_minutes: u32,
    pub active: bool,
}

impl Business {
    /// Create a business with the platform default booking configuration.
    pub fn new(id: BusinessId, name: impl Into<String>, timezone: Tz) -> Self {
        Self {
            id,
            name: name.into(),
            timezone,
            minimum_lead_time_minutes: DEFAULT_MINIMUM_LEAD_TIME_MINUTES,
            cancellation_window_minutes: DEFAULT_CANCELLATION_WINDOW_MINUTES,
            allows_multiple_bookings: false,
            default_duration_minutes: DEFAULT_APPOINTMENT_DURATION_MINUTES,
            active: true,
        }
    }

    /// "Today" as seen from this business's timezone at the given instant.
    ///
    /// Date validity must always be judged against the business-local calendar,
    /// never the server clock: a server in UTC and a business in Asia/Tokyo
    /// disagree about which date is "today" for nine hours of every day.
    pub fn local_today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.timezone).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_applies_defaults() {
        let business = Business::new(BusinessId::random(), "Peluquería Sol", chrono_tz::Europe::Madrid);
        assert_eq!(business.minimum_lead_time_minutes, 60);
        assert_eq!(business.cancellation_window_minutes, 120);
        assert_eq!(business.default_duration_minutes, 30);
        assert!(!business.allows_multiple_bookings);
        assert!(business.active);
    }

    #[test]
    fn test_local_today_ahead_of_utc() {
        let business = Business::new(BusinessId::random(), "Tokyo Salon", chrono_tz::Asia::Tokyo);
        // 16:00 UTC on June 2nd is already June 3rd, 01:00 in Tokyo.
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 16, 0, 0).unwrap();
        assert_eq!(
            business.local_today(now),
            NaiveDate::from_ymd_opt(2025, 6, 3).unwrap()
        );
    }

    #[test]
    fn test_local_today_behind_utc() {
        let business = Business::new(BusinessId::random(), "NY Barber", chrono_tz::America::New_York);
        // 01:00 UTC on June 3rd is still June 2nd evening in New York.
        let now = Utc.with_ymd_and_hms(2025, 6, 3, 1, 0, 0).unwrap();
        assert_eq!(
            business.local_today(now),
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
        );
    }
}
