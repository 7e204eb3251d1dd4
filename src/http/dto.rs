//! Data Transfer Objects for the HTTP API.
//!
//! The wire field names follow the established public contract of the
//! platform (Spanish identifiers such as `fecha` and `horarios_disponibles`);
//! everything behind the DTO boundary uses the crate's own types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Booking, BookingStatus};

// The availability payload already derives Serialize in the API layer.
pub use crate::api::AvailabilityData;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Query parameters for the availability endpoint.
///
/// `fecha` is required but modeled as `Option` so its absence maps to a 400
/// with a useful message instead of axum's generic rejection.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DisponibilidadQuery {
    /// Date to query, `YYYY-MM-DD` in the business's timezone.
    pub fecha: Option<String>,
    /// Optional service id; its duration drives the slot length.
    pub servicio: Option<i64>,
    /// Optional employee id to scope blocks and bookings.
    pub empleado: Option<i64>,
}

/// Request body for creating a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrearCitaRequest {
    /// Client identity on whose behalf the booking is made.
    pub cliente: Uuid,
    pub servicio: i64,
    #[serde(default)]
    pub empleado: Option<i64>,
    /// Start instant; the end is derived from the service duration.
    pub fecha_hora_inicio: DateTime<Utc>,
    pub nombre_cliente: String,
    #[serde(default)]
    pub telefono_cliente: String,
    #[serde(default)]
    pub email_cliente: String,
    #[serde(default)]
    pub notas: String,
}

/// Request body for cancelling a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelarCitaRequest {
    /// Client identity; must match the booking's owner.
    pub cliente: Uuid,
}

/// Booking representation returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitaResponse {
    pub id: Uuid,
    pub negocio: Uuid,
    pub servicio: i64,
    pub empleado: Option<i64>,
    pub fecha_hora_inicio: DateTime<Utc>,
    pub fecha_hora_fin: DateTime<Utc>,
    pub estado: BookingStatus,
}

impl From<Booking> for CitaResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id.value(),
            negocio: booking.business_id.value(),
            servicio: booking.service_id.value(),
            empleado: booking.employee_id.map(|e| e.value()),
            fecha_hora_inicio: booking.span.start,
            fecha_hora_fin: booking.span.end,
            estado: booking.status,
        }
    }
}
