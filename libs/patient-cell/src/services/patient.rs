use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::{Collection, Filter, RecordStore};
use shared_utils::AppState;

use crate::models::{Patient, CreatePatientRequest, UpdatePatientRequest, PatientError};

pub struct PatientService {
    store: Arc<dyn RecordStore>,
}

impl PatientService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.store.clone())
    }

    pub async fn create_patient(&self, request: CreatePatientRequest) -> Result<Patient, PatientError> {
        debug!("Creating new patient profile for: {}", request.email);
        request.validate()?;

        let now = Utc::now();
        let patient = Patient {
            id: Uuid::new_v4(),
            last_name: request.last_name,
            first_name: request.first_name,
            date_of_birth: request.date_of_birth,
            phone: request.phone,
            email: request.email,
            address: request.address,
            postal_code: request.postal_code,
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let stored = self.store
            .insert(Collection::Patients, serde_json::to_value(&patient)?)
            .await?;

        let patient: Patient = serde_json::from_value(stored)?;
        info!("Patient profile created successfully with ID: {}", patient.id);

        Ok(patient)
    }

    pub async fn get_patient(&self, patient_id: Uuid) -> Result<Patient, PatientError> {
        debug!("Fetching patient profile: {}", patient_id);

        let record = self.store
            .find_by_id(Collection::Patients, patient_id)
            .await?
            .ok_or(PatientError::NotFound)?;

        Ok(serde_json::from_value(record)?)
    }

    pub async fn list_patients(&self) -> Result<Vec<Patient>, PatientError> {
        let records = self.store
            .find(Collection::Patients, &Filter::new().order_by("last_name"))
            .await?;

        let patients = records
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Patient>, _>>()?;

        Ok(patients)
    }

    pub async fn update_patient(
        &self,
        patient_id: Uuid,
        request: UpdatePatientRequest,
    ) -> Result<Patient, PatientError> {
        debug!("Updating patient profile: {}", patient_id);
        request.validate()?;

        let mut patch = request.into_patch();
        patch.insert("updated_at".to_string(), json!(Utc::now()));

        let record = self.store
            .update(Collection::Patients, patient_id, Value::Object(patch))
            .await?
            .ok_or(PatientError::NotFound)?;

        Ok(serde_json::from_value(record)?)
    }

    pub async fn delete_patient(&self, patient_id: Uuid) -> Result<(), PatientError> {
        debug!("Deleting patient profile: {}", patient_id);

        if !self.store.delete(Collection::Patients, patient_id).await? {
            return Err(PatientError::NotFound);
        }

        info!("Patient {} deleted", patient_id);
        Ok(())
    }
}
