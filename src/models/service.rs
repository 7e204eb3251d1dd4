//! Services offered by a business.

use serde::{Deserialize, Serialize};

use crate::api::{BusinessId, ServiceId};

/// A bookable service (haircut, consultation, ...) offered by one business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub business_id: BusinessId,
    pub name: String,
    /// Appointment length for this service.
    pub duration_minutes: u32,
    /// Whether the service can be booked through the public API.
    pub online_bookable: bool,
    /// Optional cap on how many bookings of this service a single day accepts.
    pub max_per_day: Option<u32>,
    pub active: bool,
}

impl Service {
    pub fn new(
        id: ServiceId,
        business_id: BusinessId,
        name: impl Into<String>,
        duration_minutes: u32,
    ) -> Self {
        Self {
            id,
            business_id,
            name: name.into(),
            duration_minutes,
            online_bookable: true,
            max_per_day: None,
            active: true,
        }
    }

    pub fn with_max_per_day(mut self, cap: u32) -> Self {
        self.max_per_day = Some(cap);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let service = Service::new(ServiceId::new(1), BusinessId::random(), "Corte", 30);
        assert!(service.active);
        assert!(service.online_bookable);
        assert_eq!(service.max_per_day, None);
    }

    #[test]
    fn test_with_max_per_day() {
        let service =
            Service::new(ServiceId::new(1), BusinessId::random(), "Tinte", 90).with_max_per_day(3);
        assert_eq!(service.max_per_day, Some(3));
    }
}
