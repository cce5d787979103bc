use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::{Collection, RecordStore};
use shared_utils::{AppState, KeyedLocks};

use crate::models::{AppendHistoryRequest, HistoryEntry, Patient, PatientError};
use crate::services::patient::PatientService;

/// Append/remove-only ledger of clinical notes attached to a patient.
///
/// Both operations read the patient, edit the history in memory and write the
/// whole sequence back, so they run under a per-patient lock.
pub struct HistoryLedger {
    store: Arc<dyn RecordStore>,
    patients: PatientService,
    locks: KeyedLocks,
}

impl HistoryLedger {
    pub fn new(store: Arc<dyn RecordStore>, locks: KeyedLocks) -> Self {
        Self {
            patients: PatientService::new(store.clone()),
            store,
            locks,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.store.clone(), state.patient_locks.clone())
    }

    pub async fn append_history(
        &self,
        patient_id: Uuid,
        request: AppendHistoryRequest,
    ) -> Result<Patient, PatientError> {
        let note = request.note.filter(|n| !n.trim().is_empty());
        let (doctor_id, note) = match (request.doctor_id, note) {
            (Some(doctor_id), Some(note)) => (doctor_id, note),
            (doctor_id, note) => {
                let mut fields = Vec::new();
                if doctor_id.is_none() {
                    fields.push("doctorId");
                }
                if note.is_none() {
                    fields.push("note");
                }
                return Err(PatientError::MalformedRequest { fields });
            }
        };

        let _guard = self.locks.acquire(patient_id).await;
        let mut patient = self.patients.get_patient(patient_id).await?;

        let entry = HistoryEntry {
            id: Uuid::new_v4(),
            note,
            doctor_id,
            created_at: Utc::now(),
        };
        debug!("Appending history entry {} to patient {}", entry.id, patient_id);
        patient.history.push(entry);

        self.write_history(&patient).await
    }

    /// Removing an entry that does not exist is a successful no-op.
    pub async fn remove_history(
        &self,
        patient_id: Uuid,
        entry_id: Uuid,
    ) -> Result<Patient, PatientError> {
        let _guard = self.locks.acquire(patient_id).await;
        let mut patient = self.patients.get_patient(patient_id).await?;

        let before = patient.history.len();
        patient.history.retain(|entry| entry.id != entry_id);

        if patient.history.len() == before {
            debug!("No history entry {} on patient {}, nothing to remove", entry_id, patient_id);
            return Ok(patient);
        }

        info!("Removed history entry {} from patient {}", entry_id, patient_id);
        self.write_history(&patient).await
    }

    async fn write_history(&self, patient: &Patient) -> Result<Patient, PatientError> {
        let patch = json!({
            "history": patient.history,
            "updated_at": Utc::now()
        });

        let record = self.store
            .update(Collection::Patients, patient.id, patch)
            .await?
            .ok_or(PatientError::NotFound)?;

        Ok(serde_json::from_value(record)?)
    }
}
