use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_database::{Collection, InMemoryStore, RecordStore};

use crate::state::AppState;

/// Application state backed by an in-memory store the test can inspect.
pub struct TestContext {
    pub state: Arc<AppState>,
    pub store: Arc<InMemoryStore>,
}

impl Default for TestContext {
    fn default() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let state = Arc::new(AppState::new(store.clone()));
        Self { state, store }
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, collection: Collection, record: Value) -> Value {
        self.store
            .insert(collection, record)
            .await
            .expect("seeding the in-memory store cannot fail")
    }
}

/// A fixed UTC instant on 2024-03-02, handy for scheduling scenarios.
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 2, hour, minute, 0)
        .single()
        .expect("valid fixture time")
}

pub struct MockRecords;

impl MockRecords {
    pub fn doctor(id: Uuid, specialty: &str) -> Value {
        json!({
            "id": id,
            "last_name": "Tremblay",
            "first_name": "Julie",
            "phone": "418-555-0199",
            "email": "julie.tremblay@example.com",
            "specialty": specialty,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn patient(id: Uuid) -> Value {
        json!({
            "id": id,
            "last_name": "Powlowski",
            "first_name": "Lavern",
            "date_of_birth": NaiveDate::from_ymd_opt(1980, 3, 22),
            "phone": "261-839-4823",
            "email": "lavern.powlowski@example.com",
            "address": "9701 Moore Hills",
            "postal_code": "G1S 4S3",
            "history": [],
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn appointment(patient_id: Uuid, doctor_id: Uuid, start: DateTime<Utc>) -> Value {
        json!({
            "id": Uuid::new_v4(),
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "start_time": start,
            "end_time": start + Duration::minutes(30),
            "note": "Suivi annuel",
            "created_at": "2024-01-01T00:00:00Z"
        })
    }
}
