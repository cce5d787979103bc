// libs/appointment-cell/src/models.rs
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_database::StoreError;
use shared_models::error::AppError;

/// Every appointment lasts exactly one session.
pub const SESSION_MINUTES: i64 = 30;

// ==============================================================================
// TIME INTERVALS
// ==============================================================================

/// Half-open time range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeInterval {
    /// Returns `None` unless `start < end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    /// The fixed-length session window beginning at `start`, or `None` when
    /// its end is past the representable range.
    pub fn session(start: DateTime<Utc>) -> Option<Self> {
        let end = start.checked_add_signed(Duration::minutes(SESSION_MINUTES))?;
        Some(Self { start, end })
    }

    /// Two half-open intervals intersect iff each starts before the other
    /// ends. Intervals that only touch (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

// ==============================================================================
// CORE APPOINTMENT MODEL
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    pub fn interval(&self) -> TimeInterval {
        TimeInterval {
            start: self.start_time,
            end: self.end_time,
        }
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

/// Booking request as received on the wire. Every field is optional here so
/// that missing ones can be reported together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleAppointmentRequest {
    #[serde(alias = "patient_id")]
    pub patient_id: Option<Uuid>,
    #[serde(alias = "doctor_id", alias = "practitionerId")]
    pub doctor_id: Option<Uuid>,
    #[serde(alias = "start_time", alias = "start")]
    pub start_time: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

/// A booking request whose required fields are all present and whose
/// session window is representable.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub window: TimeInterval,
    pub note: String,
}

impl ScheduleAppointmentRequest {
    pub fn validate(self) -> Result<NewAppointment, AppointmentError> {
        let note = self.note.filter(|n| !n.trim().is_empty());
        let window = self.start_time.and_then(TimeInterval::session);

        match (self.patient_id, self.doctor_id, window, note) {
            (Some(patient_id), Some(doctor_id), Some(window), Some(note)) => Ok(NewAppointment {
                patient_id,
                doctor_id,
                window,
                note,
            }),
            (patient_id, doctor_id, window, note) => {
                let missing = [
                    ("patientId", patient_id.is_none()),
                    ("doctorId", doctor_id.is_none()),
                    ("startTime", window.is_none()),
                    ("note", note.is_none()),
                ]
                .into_iter()
                .filter_map(|(field, absent)| absent.then_some(field))
                .collect();

                Err(AppointmentError::MalformedRequest { missing })
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentListQuery {
    /// Restricts results to appointments starting on this calendar day (UTC).
    pub date: Option<NaiveDate>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Error)]
pub enum AppointmentError {
    #[error("Missing or invalid required fields: {}", .missing.join(", "))]
    MalformedRequest { missing: Vec<&'static str> },

    #[error("Appointment not found")]
    NotFound,

    #[error("No appointments found for {0}")]
    NoneFound(String),

    #[error("Appointment conflicts with an existing booking")]
    SchedulingConflict,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<serde_json::Error> for AppointmentError {
    fn from(err: serde_json::Error) -> Self {
        AppointmentError::Store(StoreError::Serialization(err))
    }
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::MalformedRequest { .. } => AppError::BadRequest(err.to_string()),
            AppointmentError::NotFound | AppointmentError::NoneFound(_) => AppError::NotFound(err.to_string()),
            AppointmentError::SchedulingConflict => AppError::Conflict(err.to_string()),
            AppointmentError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}
