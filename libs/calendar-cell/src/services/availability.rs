// libs/calendar-cell/src/services/availability.rs
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use crate::models::{end_of_day, start_of_day, AppointmentError, AvailableInterval};
use crate::store::AppointmentStore;

pub struct AvailabilityService {
    store: Arc<dyn AppointmentStore>,
}

impl AvailabilityService {
    pub fn new(store: Arc<dyn AppointmentStore>) -> Self {
        Self { store }
    }

    /// Free gaps in the provider's day, chronological and non-overlapping.
    ///
    /// The day window runs from midnight to the last representable instant
    /// of the day; an empty calendar yields that single full-day interval.
    /// Zero-width gaps are never emitted, so back-to-back bookings merge
    /// seamlessly. Overlapping stored rows are tolerated: the sweep cursor
    /// only ever moves forward.
    pub async fn available_intervals(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<AvailableInterval>, AppointmentError> {
        debug!("Computing availability for provider {} on {}", provider_id, date);

        let day_start = start_of_day(date);
        let day_end = end_of_day(date);

        let mut appointments: Vec<_> = self
            .store
            .list_by_provider_and_date(provider_id, date)
            .await?
            .into_iter()
            .filter(|appointment| !appointment.is_cancelled())
            .collect();

        if appointments.is_empty() {
            return Ok(vec![AvailableInterval {
                start: day_start,
                end: day_end,
            }]);
        }

        // Stable sort on start time only; ties keep their stored order.
        appointments.sort_by_key(|appointment| appointment.start_date_time);

        let mut intervals = Vec::new();
        let mut cursor = day_start;

        for appointment in &appointments {
            if cursor < appointment.start_date_time {
                intervals.push(AvailableInterval {
                    start: cursor,
                    end: appointment.start_date_time,
                });
            }
            cursor = cursor.max(appointment.end_date_time);
        }

        if cursor < day_end {
            intervals.push(AvailableInterval {
                start: cursor,
                end: day_end,
            });
        }

        Ok(intervals)
    }
}
