use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime};
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::{Collection, Filter, RecordStore};
use shared_utils::AppState;

use crate::models::{Appointment, AppointmentError};

/// Read and delete operations over stored appointments.
pub struct AppointmentService {
    store: Arc<dyn RecordStore>,
}

impl AppointmentService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.store.clone())
    }

    pub async fn get_appointment(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        debug!("Fetching appointment: {}", appointment_id);

        let record = self.store
            .find_by_id(Collection::Appointments, appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound)?;

        Ok(serde_json::from_value(record)?)
    }

    pub async fn get_doctor_appointments(
        &self,
        doctor_id: Uuid,
        date: Option<NaiveDate>,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let appointments = self.list_by("doctor_id", doctor_id, date).await?;
        if appointments.is_empty() {
            return Err(AppointmentError::NoneFound(format!("doctor {}", doctor_id)));
        }
        Ok(appointments)
    }

    pub async fn get_patient_appointments(
        &self,
        patient_id: Uuid,
        date: Option<NaiveDate>,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let appointments = self.list_by("patient_id", patient_id, date).await?;
        if appointments.is_empty() {
            return Err(AppointmentError::NoneFound(format!("patient {}", patient_id)));
        }
        Ok(appointments)
    }

    pub async fn delete_appointment(&self, appointment_id: Uuid) -> Result<(), AppointmentError> {
        debug!("Deleting appointment: {}", appointment_id);

        if !self.store.delete(Collection::Appointments, appointment_id).await? {
            return Err(AppointmentError::NotFound);
        }

        info!("Appointment {} deleted", appointment_id);
        Ok(())
    }

    async fn list_by(
        &self,
        field: &str,
        id: Uuid,
        date: Option<NaiveDate>,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        debug!("Listing appointments where {} = {} (date: {:?})", field, id, date);

        let mut filter = Filter::new().eq(field, id);

        if let Some(date) = date {
            // NaiveTime::default() is midnight
            let day_start = date.and_time(NaiveTime::default()).and_utc();
            filter = filter.gte("start_time", day_start);
            if let Some(day_end) = day_start.checked_add_signed(Duration::days(1)) {
                filter = filter.lt("start_time", day_end);
            }
        }

        let records = self.store
            .find(Collection::Appointments, &filter.order_by("start_time"))
            .await?;

        let appointments = records
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Appointment>, _>>()?;

        Ok(appointments)
    }
}
