use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;
use chrono::{DateTime, Utc, NaiveDate};

use shared_database::StoreError;
use shared_models::error::AppError;
use shared_utils::validation::{blank_fields, blank_supplied_fields};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub last_name: String,
    pub first_name: String,
    pub date_of_birth: NaiveDate,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub postal_code: String,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One clinical note in a patient's history. Entries are never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub note: String,
    pub doctor_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub last_name: String,
    pub first_name: String,
    pub date_of_birth: NaiveDate,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub postal_code: String,
}

impl CreatePatientRequest {
    pub fn validate(&self) -> Result<(), PatientError> {
        let fields = blank_fields(&[
            ("last_name", self.last_name.as_str()),
            ("first_name", self.first_name.as_str()),
            ("phone", self.phone.as_str()),
            ("email", self.email.as_str()),
            ("address", self.address.as_str()),
            ("postal_code", self.postal_code.as_str()),
        ]);

        if fields.is_empty() {
            Ok(())
        } else {
            Err(PatientError::MalformedRequest { fields })
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePatientRequest {
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
}

impl UpdatePatientRequest {
    /// Supplied fields must not be blank; absent fields are left untouched.
    pub fn validate(&self) -> Result<(), PatientError> {
        let fields = blank_supplied_fields(&[
            ("last_name", self.last_name.as_deref()),
            ("first_name", self.first_name.as_deref()),
            ("phone", self.phone.as_deref()),
            ("email", self.email.as_deref()),
            ("address", self.address.as_deref()),
            ("postal_code", self.postal_code.as_deref()),
        ]);

        if fields.is_empty() {
            Ok(())
        } else {
            Err(PatientError::MalformedRequest { fields })
        }
    }

    /// The supplied fields as a store patch.
    pub fn into_patch(self) -> Map<String, Value> {
        let mut patch = Map::new();

        if let Some(last_name) = self.last_name {
            patch.insert("last_name".to_string(), json!(last_name));
        }
        if let Some(first_name) = self.first_name {
            patch.insert("first_name".to_string(), json!(first_name));
        }
        if let Some(date_of_birth) = self.date_of_birth {
            patch.insert("date_of_birth".to_string(), json!(date_of_birth));
        }
        if let Some(phone) = self.phone {
            patch.insert("phone".to_string(), json!(phone));
        }
        if let Some(email) = self.email {
            patch.insert("email".to_string(), json!(email));
        }
        if let Some(address) = self.address {
            patch.insert("address".to_string(), json!(address));
        }
        if let Some(postal_code) = self.postal_code {
            patch.insert("postal_code".to_string(), json!(postal_code));
        }

        patch
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendHistoryRequest {
    #[serde(alias = "doctor_id")]
    pub doctor_id: Option<Uuid>,
    pub note: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("Missing or blank required fields: {}", .fields.join(", "))]
    MalformedRequest { fields: Vec<&'static str> },

    #[error("Patient not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<serde_json::Error> for PatientError {
    fn from(err: serde_json::Error) -> Self {
        PatientError::Store(StoreError::Serialization(err))
    }
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::MalformedRequest { .. } => AppError::BadRequest(err.to_string()),
            PatientError::NotFound => AppError::NotFound(err.to_string()),
            PatientError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}
