use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use shared_database::{Collection, RecordStore, StoreError};
use shared_utils::{AppState, KeyedLocks};

use crate::models::{Appointment, AppointmentError, ScheduleAppointmentRequest};
use crate::services::conflict::ConflictDetectionService;

/// Books appointments while keeping every doctor's schedule free of overlaps.
///
/// The conflict query and the insert run under a per-doctor lock, so two
/// concurrent requests for the same doctor cannot both pass the check. The
/// lock only covers this process; a store-side exclusion constraint that
/// rejects an insert is reported the same way as a detected overlap.
///
/// Conflicting appointments are never disclosed to the caller, only the fact
/// that a conflict exists.
pub struct AppointmentScheduler {
    store: Arc<dyn RecordStore>,
    conflicts: ConflictDetectionService,
    locks: KeyedLocks,
}

impl AppointmentScheduler {
    pub fn new(store: Arc<dyn RecordStore>, locks: KeyedLocks) -> Self {
        Self {
            conflicts: ConflictDetectionService::new(store.clone()),
            store,
            locks,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.store.clone(), state.doctor_schedule_locks.clone())
    }

    #[instrument(skip(self, request))]
    pub async fn schedule_appointment(
        &self,
        request: ScheduleAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let booking = request.validate()?;
        let window = booking.window;

        debug!("Scheduling appointment for doctor {} at {}", booking.doctor_id, window.start);

        let _guard = self.locks.acquire(booking.doctor_id).await;

        if self.conflicts.has_conflict(booking.doctor_id, &window).await? {
            return Err(AppointmentError::SchedulingConflict);
        }

        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_id: booking.patient_id,
            doctor_id: booking.doctor_id,
            start_time: window.start,
            end_time: window.end,
            note: booking.note,
            created_at: Utc::now(),
        };

        let record = serde_json::to_value(&appointment)?;
        let stored = match self.store.insert(Collection::Appointments, record).await {
            Ok(stored) => stored,
            Err(StoreError::Constraint(reason)) => {
                warn!("Store rejected appointment for doctor {}: {}", booking.doctor_id, reason);
                return Err(AppointmentError::SchedulingConflict);
            }
            Err(e) => return Err(e.into()),
        };

        let appointment: Appointment = serde_json::from_value(stored)?;
        info!("Appointment {} booked for doctor {} at {}",
              appointment.id, appointment.doctor_id, appointment.start_time);

        Ok(appointment)
    }
}
