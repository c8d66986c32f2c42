// libs/calendar-cell/src/services/consistency.rs
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;
use uuid::Uuid;

/// One lock per provider calendar.
///
/// Every conflict check is a read-check-then-write sequence against the
/// store, so two concurrent writers for the same provider could both pass
/// the check and commit overlapping rows. Holding the provider's lock
/// across the check-and-write pair closes that window in-process. Locks
/// for distinct providers are independent.
pub struct ProviderLocks {
    locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl ProviderLocks {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub async fn acquire(&self, provider_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(locks.entry(provider_id).or_default())
        };

        debug!("Acquiring schedule lock for provider {}", provider_id);
        lock.lock_owned().await
    }
}

impl Default for ProviderLocks {
    fn default() -> Self {
        Self::new()
    }
}
