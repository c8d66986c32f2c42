// libs/calendar-cell/src/services/recurrence.rs
use std::sync::Arc;

use chrono::{Months, NaiveDate, NaiveTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{
    AppointmentError, CreateRecurringBlockRequest, CreateYearlyBlockRequest, RecurringBlockReport,
};
use crate::services::conflict::ConflictDetectionService;
use crate::services::consistency::ProviderLocks;
use crate::store::{AppointmentStore, NewAppointment};

/// Expands a daily time-of-day range into one concrete block per date.
///
/// Expansion is best-effort, not transactional: a date that conflicts is
/// recorded and skipped, every other date's block is persisted, and the
/// report lists all conflicting dates at the end.
pub struct RecurringBlockService {
    store: Arc<dyn AppointmentStore>,
    conflict_service: ConflictDetectionService,
    locks: Arc<ProviderLocks>,
}

impl RecurringBlockService {
    pub fn new(store: Arc<dyn AppointmentStore>, locks: Arc<ProviderLocks>) -> Self {
        Self {
            conflict_service: ConflictDetectionService::new(Arc::clone(&store)),
            store,
            locks,
        }
    }

    /// Expand over an explicit inclusive date range. A degenerate range
    /// (`start_date == end_date`) still processes exactly that one day.
    pub async fn create_recurring_block(
        &self,
        request: CreateRecurringBlockRequest,
    ) -> Result<RecurringBlockReport, AppointmentError> {
        let provider_id = request.provider_id.ok_or_else(|| {
            AppointmentError::Validation("Provider ID is required.".to_string())
        })?;

        self.expand(
            provider_id,
            request.start_time,
            request.end_time,
            request.start_date,
            request.end_date,
        )
        .await
    }

    /// Fixed-rule variant: today through one year from today, inclusive.
    pub async fn create_recurring_block_in_one_year(
        &self,
        request: CreateYearlyBlockRequest,
    ) -> Result<RecurringBlockReport, AppointmentError> {
        let provider_id = request.provider_id.ok_or_else(|| {
            AppointmentError::Validation("Provider ID is required.".to_string())
        })?;

        let start_date = Utc::now().date_naive();
        let end_date = start_date + Months::new(12);

        self.expand(provider_id, request.start_time, request.end_time, start_date, end_date)
            .await
    }

    async fn expand(
        &self,
        provider_id: Uuid,
        start_time: NaiveTime,
        end_time: NaiveTime,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<RecurringBlockReport, AppointmentError> {
        if start_time >= end_time {
            return Err(AppointmentError::InvalidTime(
                "Start time must be before end time".to_string(),
            ));
        }

        info!(
            "Expanding recurring block for provider {} from {} to {}",
            provider_id, start_date, end_date
        );

        let mut created_dates = Vec::new();
        let mut conflict_dates = Vec::new();

        for date in start_date.iter_days().take_while(|d| *d <= end_date) {
            let occurrence_start = date.and_time(start_time);
            let occurrence_end = date.and_time(end_time);

            // Lock per date, so a long expansion never holds the
            // provider's calendar across the whole range.
            let _guard = self.locks.acquire(provider_id).await;

            if self
                .conflict_service
                .has_conflict(provider_id, occurrence_start, occurrence_end, None)
                .await?
            {
                debug!("Recurring block occurrence on {} conflicts, skipping", date);
                conflict_dates.push(date);
            } else {
                self.store
                    .insert(NewAppointment::block(provider_id, occurrence_start, occurrence_end))
                    .await?;
                created_dates.push(date);
            }
        }

        info!(
            "Recurring block expansion for provider {} created {} blocks, {} conflicts",
            provider_id,
            created_dates.len(),
            conflict_dates.len()
        );

        Ok(RecurringBlockReport {
            start_date,
            end_date,
            created_dates,
            conflict_dates,
        })
    }
}
