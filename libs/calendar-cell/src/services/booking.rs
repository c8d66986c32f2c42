// libs/calendar-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{
    status, Appointment, AppointmentError, CreateAppointmentRequest, CreateBlockRequest,
    UpdateAppointmentRequest,
};
use crate::services::conflict::ConflictDetectionService;
use crate::services::consistency::ProviderLocks;
use crate::store::{AppointmentPatch, AppointmentStore, NewAppointment};

fn ensure_ordered(start: NaiveDateTime, end: NaiveDateTime) -> Result<(), AppointmentError> {
    if start >= end {
        return Err(AppointmentError::InvalidTime(
            "Start time must be before end time".to_string(),
        ));
    }
    Ok(())
}

/// Orchestrates the appointment lifecycle: create, block, partial update,
/// cancel, hard delete and the read-side queries. Every write that depends
/// on a conflict check runs under the provider's schedule lock.
pub struct AppointmentBookingService {
    store: Arc<dyn AppointmentStore>,
    conflict_service: ConflictDetectionService,
    locks: Arc<ProviderLocks>,
}

impl AppointmentBookingService {
    pub fn new(store: Arc<dyn AppointmentStore>, locks: Arc<ProviderLocks>) -> Self {
        Self {
            conflict_service: ConflictDetectionService::new(Arc::clone(&store)),
            store,
            locks,
        }
    }

    pub async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        info!(
            "Creating appointment for provider {} from {} to {}",
            request.provider_id, request.start_date_time, request.end_date_time
        );

        ensure_ordered(request.start_date_time, request.end_date_time)?;

        let _guard = self.locks.acquire(request.provider_id).await;

        if self
            .conflict_service
            .has_conflict(
                request.provider_id,
                request.start_date_time,
                request.end_date_time,
                None,
            )
            .await?
        {
            return Err(AppointmentError::ConflictDetected);
        }

        self.store
            .insert(NewAppointment {
                provider_id: request.provider_id,
                user_id: request.user_id,
                start_date_time: request.start_date_time,
                end_date_time: request.end_date_time,
                status: request.status.unwrap_or_else(|| status::SCHEDULED.to_string()),
                service_type: request.service_type,
                comments: request.comments,
            })
            .await
    }

    /// Reserve a concrete interval for the provider with no client
    /// attached. Blocks share the provider's interval space with regular
    /// bookings, so the same conflict rules apply.
    pub async fn create_block(
        &self,
        request: CreateBlockRequest,
    ) -> Result<Appointment, AppointmentError> {
        let provider_id = request.provider_id.ok_or_else(|| {
            AppointmentError::Validation("Provider ID is required.".to_string())
        })?;

        info!(
            "Creating block for provider {} from {} to {}",
            provider_id, request.start_date_time, request.end_date_time
        );

        ensure_ordered(request.start_date_time, request.end_date_time)?;

        let _guard = self.locks.acquire(provider_id).await;

        if self
            .conflict_service
            .has_conflict(provider_id, request.start_date_time, request.end_date_time, None)
            .await?
        {
            return Err(AppointmentError::ConflictDetected);
        }

        self.store
            .insert(NewAppointment::block(
                provider_id,
                request.start_date_time,
                request.end_date_time,
            ))
            .await
    }

    /// Partial update. Fields left out of the request keep their stored
    /// values. The conflict check only runs when a time bound is supplied;
    /// the missing bound is backfilled from the stored row and the
    /// appointment's own interval is excluded from the candidate set.
    pub async fn update_appointment(
        &self,
        request: UpdateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let appointment_id = request.appointment_id.ok_or_else(|| {
            AppointmentError::Validation(
                "Appointment ID is required for updating an appointment.".to_string(),
            )
        })?;

        debug!("Updating appointment {}", appointment_id);

        let current = self
            .store
            .get(appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound)?;

        let time_changed =
            request.start_date_time.is_some() || request.end_date_time.is_some();

        let _guard = if time_changed {
            Some(self.locks.acquire(current.provider_id).await)
        } else {
            None
        };

        if time_changed {
            let candidate_start = request.start_date_time.unwrap_or(current.start_date_time);
            let candidate_end = request.end_date_time.unwrap_or(current.end_date_time);

            ensure_ordered(candidate_start, candidate_end)?;

            if self
                .conflict_service
                .has_conflict(
                    current.provider_id,
                    candidate_start,
                    candidate_end,
                    Some(appointment_id),
                )
                .await?
            {
                return Err(AppointmentError::ConflictDetected);
            }
        }

        self.store
            .apply_update(AppointmentPatch {
                appointment_id,
                user_id: request.user_id,
                start_date_time: request.start_date_time,
                end_date_time: request.end_date_time,
                status: request.status,
                service_type: request.service_type,
                comments: request.comments,
            })
            .await?;

        self.store
            .get(appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound)
    }

    /// Flip the appointment to cancelled, keeping the row for history.
    /// Returns whether a row was actually affected; an unknown or already
    /// cancelled id reports `false` instead of failing.
    pub async fn cancel_appointment(&self, id: Uuid) -> Result<bool, AppointmentError> {
        debug!("Cancelling appointment {}", id);
        let rows_affected = self.store.cancel(id).await?;
        Ok(rows_affected == 1)
    }

    /// Hard-remove a row. Intended for blocks, which would otherwise
    /// accumulate without bound; the contract permits it on user
    /// appointments too, at the cost of losing their history.
    pub async fn delete_block(&self, id: Uuid) -> Result<bool, AppointmentError> {
        debug!("Deleting block {}", id);
        let rows_affected = self.store.delete(id).await?;
        Ok(rows_affected == 1)
    }

    pub async fn get_appointment(&self, id: Uuid) -> Result<Appointment, AppointmentError> {
        self.store.get(id).await?.ok_or(AppointmentError::NotFound)
    }

    pub async fn appointments_by_provider(
        &self,
        provider_id: Uuid,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        self.store.list_by_provider(provider_id).await
    }

    pub async fn appointments_by_provider_and_date(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        self.store.list_by_provider_and_date(provider_id, date).await
    }

    pub async fn appointments_within_date_range(
        &self,
        provider_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        self.store
            .list_by_provider_in_range(provider_id, start_date, end_date)
            .await
    }

    pub async fn appointment_history(
        &self,
        provider_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        self.store.list_history(provider_id, user_id).await
    }
}
