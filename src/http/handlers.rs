//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the service
//! layer for business logic. "Now" is captured once per request at the edge
//! and threaded into the services.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use super::dto::{
    AvailabilityData, CancelarCitaRequest, CitaResponse, CrearCitaRequest, DisponibilidadQuery,
    HealthResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{BookingId, BusinessId, EmployeeId, ServiceId, UserId};
use crate::services::{self, AvailabilityQuery, BookingRequest, Caller};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// GET /health
///
/// Health check endpoint to verify the service is running and the storage
/// backend is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

/// GET /negocios/{negocio_id}/disponibilidad?fecha=YYYY-MM-DD
///
/// Compute the bookable start times for a business on a date. Optional
/// `servicio` and `empleado` parameters narrow the computation.
pub async fn get_disponibilidad(
    State(state): State<AppState>,
    Path(negocio_id): Path<Uuid>,
    Query(params): Query<DisponibilidadQuery>,
) -> HandlerResult<AvailabilityData> {
    let raw_fecha = params
        .fecha
        .ok_or_else(|| AppError::BadRequest("query parameter 'fecha' is required".to_string()))?;
    let fecha = NaiveDate::parse_from_str(&raw_fecha, "%Y-%m-%d").map_err(|_| {
        AppError::BadRequest(format!("'{}' is not a valid YYYY-MM-DD date", raw_fecha))
    })?;

    let query = AvailabilityQuery {
        business_id: BusinessId::new(negocio_id),
        date: fecha,
        service_id: params.servicio.map(ServiceId::new),
        employee_id: params.empleado.map(EmployeeId::new),
    };

    let slots = services::compute_available_slots(
        state.repository.as_ref(),
        &query,
        state.engine,
        Utc::now(),
    )
    .await?;

    Ok(Json(AvailabilityData {
        fecha,
        horarios_disponibles: slots,
    }))
}

/// POST /negocios/{negocio_id}/citas
///
/// Create a pending booking. Returns 201 with the stored booking, or 409 when
/// the slot is already taken.
pub async fn crear_cita(
    State(state): State<AppState>,
    Path(negocio_id): Path<Uuid>,
    Json(request): Json<CrearCitaRequest>,
) -> Result<(StatusCode, Json<CitaResponse>), AppError> {
    let caller = Caller {
        user_id: UserId::new(request.cliente),
        display_name: request.nombre_cliente.clone(),
    };
    let booking_request = BookingRequest {
        business_id: BusinessId::new(negocio_id),
        service_id: ServiceId::new(request.servicio),
        employee_id: request.empleado.map(EmployeeId::new),
        start: request.fecha_hora_inicio,
        client_name: request.nombre_cliente,
        client_phone: request.telefono_cliente,
        client_email: request.email_cliente,
        notes: request.notas,
    };

    let booking = services::create_booking(
        state.repository.as_ref(),
        &caller,
        &booking_request,
        Utc::now(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(booking.into())))
}

/// POST /citas/{cita_id}/cancelar
///
/// Cancel one of the caller's bookings, subject to the business's
/// cancellation window.
pub async fn cancelar_cita(
    State(state): State<AppState>,
    Path(cita_id): Path<Uuid>,
    Json(request): Json<CancelarCitaRequest>,
) -> HandlerResult<CitaResponse> {
    let caller = Caller {
        user_id: UserId::new(request.cliente),
        display_name: String::new(),
    };

    let booking = services::cancel_booking(
        state.repository.as_ref(),
        &caller,
        BookingId::new(cita_id),
        Utc::now(),
    )
    .await?;

    Ok(Json(booking.into()))
}
