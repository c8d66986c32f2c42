// libs/calendar-cell/src/services/conflict.rs
use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::AppointmentError;
use crate::store::AppointmentStore;

/// Overlap predicate between a candidate slot and an existing one.
///
/// The boundary rules are part of the service contract: a candidate that
/// merely touches an existing interval (`candidate_end == existing_start`
/// or `candidate_start == existing_end`) does NOT conflict, so
/// back-to-back bookings are always allowed.
pub fn slots_collide(
    candidate_start: NaiveDateTime,
    candidate_end: NaiveDateTime,
    existing_start: NaiveDateTime,
    existing_end: NaiveDateTime,
) -> bool {
    // new start falls inside the existing slot
    (candidate_start >= existing_start && candidate_start < existing_end)
        // new end falls inside the existing slot
        || (candidate_end > existing_start && candidate_end <= existing_end)
        // new slot fully contains the existing slot
        || (candidate_start <= existing_start && candidate_end >= existing_end)
}

pub struct ConflictDetectionService {
    store: Arc<dyn AppointmentStore>,
}

impl ConflictDetectionService {
    pub fn new(store: Arc<dyn AppointmentStore>) -> Self {
        Self { store }
    }

    /// Check whether the candidate slot collides with any active
    /// appointment or block of the provider. Cancelled rows never count.
    /// `exclude_appointment_id` keeps an update from conflicting with its
    /// own stored interval.
    pub async fn has_conflict(
        &self,
        provider_id: Uuid,
        candidate_start: NaiveDateTime,
        candidate_end: NaiveDateTime,
        exclude_appointment_id: Option<Uuid>,
    ) -> Result<bool, AppointmentError> {
        debug!(
            "Checking conflicts for provider {} from {} to {}",
            provider_id, candidate_start, candidate_end
        );

        let existing = self.store.list_by_provider(provider_id).await?;

        let conflict = existing
            .iter()
            .filter(|appointment| !appointment.is_cancelled())
            .filter(|appointment| exclude_appointment_id != Some(appointment.id))
            .any(|appointment| {
                slots_collide(
                    candidate_start,
                    candidate_end,
                    appointment.start_date_time,
                    appointment.end_date_time,
                )
            });

        if conflict {
            warn!(
                "Conflict detected for provider {} between {} and {}",
                provider_id, candidate_start, candidate_end
            );
        }

        Ok(conflict)
    }
}
