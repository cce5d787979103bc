use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;
use shared_utils::AppState;

use crate::models::{AppendHistoryRequest, CreatePatientRequest, UpdatePatientRequest};
use crate::services::{HistoryLedger, PatientService};

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreatePatientRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let request = json_body(payload)?;
    let service = PatientService::from_state(&state);

    let patient = service.create_patient(request).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/patients/{}", patient.id))],
        Json(json!({
            "success": true,
            "patient": patient,
            "message": "Patient created successfully"
        })),
    ).into_response())
}

#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::from_state(&state);

    let patients = service.list_patients().await?;

    Ok(Json(json!({
        "patients": patients,
        "total": patients.len()
    })))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::from_state(&state);

    let patient = service.get_patient(patient_id).await?;

    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<Uuid>,
    payload: Result<Json<UpdatePatientRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let request = json_body(payload)?;
    let service = PatientService::from_state(&state);

    let patient = service.update_patient(patient_id, request).await?;

    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let service = PatientService::from_state(&state);

    service.delete_patient(patient_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn append_history(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<Uuid>,
    payload: Result<Json<AppendHistoryRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let request = json_body(payload)?;
    let ledger = HistoryLedger::from_state(&state);

    let patient = ledger.append_history(patient_id, request).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/patients/{}", patient.id))],
        Json(json!({
            "success": true,
            "patient": patient,
            "message": "History entry added"
        })),
    ).into_response())
}

#[axum::debug_handler]
pub async fn remove_history(
    State(state): State<Arc<AppState>>,
    Path((patient_id, entry_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    let ledger = HistoryLedger::from_state(&state);

    ledger.remove_history(patient_id, entry_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
