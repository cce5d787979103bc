use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use shared_config::{AppConfig, StoreBackend};
use shared_database::{InMemoryStore, RecordStore, SupabaseStore};

use crate::locks::KeyedLocks;

/// Shared handler state: the record store handle and the lock registries
/// that serialize writes per doctor and per patient.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub doctor_schedule_locks: KeyedLocks,
    pub patient_locks: KeyedLocks,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            doctor_schedule_locks: KeyedLocks::new(),
            patient_locks: KeyedLocks::new(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let store: Arc<dyn RecordStore> = match config.store_backend {
            StoreBackend::Supabase => {
                info!("Using Supabase record store at {}", config.supabase_url);
                Arc::new(SupabaseStore::new(config)?)
            }
            StoreBackend::Memory => {
                info!("Using in-memory record store");
                Arc::new(InMemoryStore::new())
            }
        };

        Ok(Self::new(store))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }
}
