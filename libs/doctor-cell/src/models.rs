use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;
use chrono::{DateTime, Utc};

use shared_database::StoreError;
use shared_models::error::AppError;
use shared_utils::validation::{blank_fields, blank_supplied_fields};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub last_name: String,
    pub first_name: String,
    pub phone: String,
    pub email: String,
    pub specialty: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DoctorSearchFilters {
    pub specialty: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    pub last_name: String,
    pub first_name: String,
    pub phone: String,
    pub email: String,
    pub specialty: String,
}

impl CreateDoctorRequest {
    pub fn validate(&self) -> Result<(), DoctorError> {
        let fields = blank_fields(&[
            ("last_name", self.last_name.as_str()),
            ("first_name", self.first_name.as_str()),
            ("phone", self.phone.as_str()),
            ("email", self.email.as_str()),
            ("specialty", self.specialty.as_str()),
        ]);

        if fields.is_empty() {
            Ok(())
        } else {
            Err(DoctorError::MalformedRequest { fields })
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDoctorRequest {
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub specialty: Option<String>,
}

impl UpdateDoctorRequest {
    pub fn validate(&self) -> Result<(), DoctorError> {
        let fields = blank_supplied_fields(&[
            ("last_name", self.last_name.as_deref()),
            ("first_name", self.first_name.as_deref()),
            ("phone", self.phone.as_deref()),
            ("email", self.email.as_deref()),
            ("specialty", self.specialty.as_deref()),
        ]);

        if fields.is_empty() {
            Ok(())
        } else {
            Err(DoctorError::MalformedRequest { fields })
        }
    }

    pub fn into_patch(self) -> Map<String, Value> {
        [
            ("last_name", self.last_name),
            ("first_name", self.first_name),
            ("phone", self.phone),
            ("email", self.email),
            ("specialty", self.specialty),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field.to_string(), json!(v))))
        .collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DoctorError {
    #[error("Missing or blank required fields: {}", .fields.join(", "))]
    MalformedRequest { fields: Vec<&'static str> },

    #[error("Doctor not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<serde_json::Error> for DoctorError {
    fn from(err: serde_json::Error) -> Self {
        DoctorError::Store(StoreError::Serialization(err))
    }
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::MalformedRequest { .. } => AppError::BadRequest(err.to_string()),
            DoctorError::NotFound => AppError::NotFound(err.to_string()),
            DoctorError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}
