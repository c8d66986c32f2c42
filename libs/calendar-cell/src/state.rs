// libs/calendar-cell/src/state.rs
use std::sync::Arc;

use crate::services::consistency::ProviderLocks;
use crate::store::AppointmentStore;

/// Shared state behind the calendar routes. The lock registry must
/// outlive individual requests, so it lives here rather than in the
/// per-request services.
#[derive(Clone)]
pub struct CalendarState {
    pub store: Arc<dyn AppointmentStore>,
    pub locks: Arc<ProviderLocks>,
}

impl CalendarState {
    pub fn new(store: Arc<dyn AppointmentStore>) -> Self {
        Self {
            store,
            locks: Arc::new(ProviderLocks::new()),
        }
    }
}
