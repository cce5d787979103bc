use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use shared_database::{Collection, Filter, RecordStore};

use crate::models::{Appointment, AppointmentError, TimeInterval};

pub struct ConflictDetectionService {
    store: Arc<dyn RecordStore>,
}

impl ConflictDetectionService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Appointments of `doctor_id` whose interval overlaps `window`.
    ///
    /// Always reads from the store; nothing is cached between calls.
    pub async fn find_conflicts(
        &self,
        doctor_id: Uuid,
        window: &TimeInterval,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        debug!("Checking conflicts for doctor {} from {} to {}",
               doctor_id, window.start, window.end);

        let candidates = self.get_doctor_appointments_starting_before(doctor_id, window).await?;

        let conflicting: Vec<Appointment> = candidates
            .into_iter()
            .filter(|appointment| appointment.interval().overlaps(window))
            .collect();

        if !conflicting.is_empty() {
            warn!("Conflict detected for doctor {} - {} conflicting appointments",
                  doctor_id, conflicting.len());
        }

        Ok(conflicting)
    }

    pub async fn has_conflict(
        &self,
        doctor_id: Uuid,
        window: &TimeInterval,
    ) -> Result<bool, AppointmentError> {
        Ok(!self.find_conflicts(doctor_id, window).await?.is_empty())
    }

    // The range condition only narrows the candidate set; the overlap
    // predicate decides.
    async fn get_doctor_appointments_starting_before(
        &self,
        doctor_id: Uuid,
        window: &TimeInterval,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let filter = Filter::new()
            .eq("doctor_id", doctor_id)
            .lt("start_time", window.end)
            .order_by("start_time");

        let records = self.store.find(Collection::Appointments, &filter).await?;

        let appointments = records
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Appointment>, _>>()?;

        Ok(appointments)
    }
}
