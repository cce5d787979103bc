use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::{Collection, Filter, RecordStore};
use shared_utils::AppState;

use crate::models::{
    Doctor, DoctorError, DoctorSearchFilters,
    CreateDoctorRequest, UpdateDoctorRequest,
};

pub struct DoctorService {
    store: Arc<dyn RecordStore>,
}

impl DoctorService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.store.clone())
    }

    /// Create a new doctor profile
    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> Result<Doctor, DoctorError> {
        debug!("Creating new doctor profile for: {}", request.email);
        request.validate()?;

        let now = Utc::now();
        let doctor = Doctor {
            id: Uuid::new_v4(),
            last_name: request.last_name,
            first_name: request.first_name,
            phone: request.phone,
            email: request.email,
            specialty: request.specialty,
            created_at: now,
            updated_at: now,
        };

        let stored = self.store
            .insert(Collection::Doctors, serde_json::to_value(&doctor)?)
            .await?;

        let doctor: Doctor = serde_json::from_value(stored)?;
        info!("Doctor profile created successfully with ID: {}", doctor.id);

        Ok(doctor)
    }

    pub async fn get_doctor(&self, doctor_id: Uuid) -> Result<Doctor, DoctorError> {
        debug!("Fetching doctor profile: {}", doctor_id);

        let record = self.store
            .find_by_id(Collection::Doctors, doctor_id)
            .await?
            .ok_or(DoctorError::NotFound)?;

        Ok(serde_json::from_value(record)?)
    }

    /// Search doctors, optionally restricted to one specialty
    pub async fn search_doctors(&self, filters: DoctorSearchFilters) -> Result<Vec<Doctor>, DoctorError> {
        debug!("Searching doctors with filters: {:?}", filters);

        let mut filter = Filter::new();
        if let Some(specialty) = filters.specialty.filter(|s| !s.trim().is_empty()) {
            filter = filter.eq("specialty", specialty);
        }

        let records = self.store
            .find(Collection::Doctors, &filter.order_by("last_name"))
            .await?;

        let doctors = records
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Doctor>, _>>()?;

        debug!("Found {} doctors", doctors.len());
        Ok(doctors)
    }

    pub async fn update_doctor(
        &self,
        doctor_id: Uuid,
        request: UpdateDoctorRequest,
    ) -> Result<Doctor, DoctorError> {
        debug!("Updating doctor profile: {}", doctor_id);
        request.validate()?;

        let mut patch = request.into_patch();
        patch.insert("updated_at".to_string(), json!(Utc::now()));

        let record = self.store
            .update(Collection::Doctors, doctor_id, Value::Object(patch))
            .await?
            .ok_or(DoctorError::NotFound)?;

        Ok(serde_json::from_value(record)?)
    }

    pub async fn delete_doctor(&self, doctor_id: Uuid) -> Result<(), DoctorError> {
        debug!("Deleting doctor profile: {}", doctor_id);

        if !self.store.delete(Collection::Doctors, doctor_id).await? {
            return Err(DoctorError::NotFound);
        }

        info!("Doctor {} deleted", doctor_id);
        Ok(())
    }
}
