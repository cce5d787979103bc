// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use shared_models::error::AppError;
use shared_utils::AppState;

use crate::models::{AppointmentListQuery, ScheduleAppointmentRequest};
use crate::services::{AppointmentScheduler, AppointmentService};

#[axum::debug_handler]
pub async fn schedule_appointment(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ScheduleAppointmentRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let scheduler = AppointmentScheduler::from_state(&state);
    let appointment = scheduler.schedule_appointment(request).await?;

    let location = format!("/appointments/{}", appointment.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(json!({
            "success": true,
            "appointment": appointment,
            "message": "Appointment booked successfully"
        })),
    ).into_response())
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let service = AppointmentService::from_state(&state);
    let appointment = service.get_appointment(appointment_id).await?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn get_doctor_appointments(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
    Query(query): Query<AppointmentListQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let service = AppointmentService::from_state(&state);
    let appointments = service.get_doctor_appointments(doctor_id, query.date).await?;

    Ok(Json(json!({
        "success": true,
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn get_patient_appointments(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<Uuid>,
    Query(query): Query<AppointmentListQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let service = AppointmentService::from_state(&state);
    let appointments = service.get_patient_appointments(patient_id, query.date).await?;

    Ok(Json(json!({
        "success": true,
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let service = AppointmentService::from_state(&state);
    service.delete_appointment(appointment_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
