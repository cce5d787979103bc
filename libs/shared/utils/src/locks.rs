use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;
use uuid::Uuid;

/// Registry of per-key exclusive locks.
///
/// Used to serialize check-then-write sequences that must not interleave for
/// the same entity, e.g. two bookings for one doctor. Entries nobody holds or
/// waits on are pruned on the next acquisition.
#[derive(Clone, Default)]
pub struct KeyedLocks {
    locks: Arc<Mutex<HashMap<Uuid, Arc<Mutex<()>>>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, key: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.retain(|k, lock| *k == key || Arc::strong_count(lock) > 1);
            locks.entry(key).or_default().clone()
        };

        debug!("Waiting for lock on {}", key);
        lock.lock_owned().await
    }

    pub async fn tracked_keys(&self) -> usize {
        self.locks.lock().await.len()
    }
}
