// libs/calendar-cell/src/store/memory.rs
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{status, Appointment, AppointmentError};
use crate::store::{AppointmentPatch, AppointmentStore, NewAppointment};

/// In-process store used by the test suites and for running the API
/// without a database. Matches the PostgREST store's observable behavior:
/// listings ordered by start time, day/range membership by start time,
/// cancel affecting 0 rows when the row is gone or already cancelled.
#[derive(Default)]
pub struct InMemoryAppointmentStore {
    rows: RwLock<HashMap<Uuid, Appointment>>,
}

impl InMemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(mut rows: Vec<Appointment>) -> Vec<Appointment> {
        rows.sort_by_key(|appointment| appointment.start_date_time);
        rows
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn insert(&self, appointment: NewAppointment) -> Result<Appointment, AppointmentError> {
        let now = Utc::now();
        let row = Appointment {
            id: Uuid::new_v4(),
            provider_id: appointment.provider_id,
            user_id: appointment.user_id,
            start_date_time: appointment.start_date_time,
            end_date_time: appointment.end_date_time,
            status: appointment.status,
            service_type: appointment.service_type,
            comments: appointment.comments,
            created_at: now,
            updated_at: now,
        };

        self.rows.write().await.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Appointment>, AppointmentError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn list_by_provider(&self, provider_id: Uuid) -> Result<Vec<Appointment>, AppointmentError> {
        let rows = self
            .rows
            .read()
            .await
            .values()
            .filter(|appointment| appointment.provider_id == provider_id)
            .cloned()
            .collect();
        Ok(Self::sorted(rows))
    }

    async fn list_by_provider_and_date(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        self.list_by_provider_in_range(provider_id, date, date).await
    }

    async fn list_by_provider_in_range(
        &self,
        provider_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let rows = self
            .rows
            .read()
            .await
            .values()
            .filter(|appointment| {
                let start_date_of_row = appointment.start_date_time.date();
                appointment.provider_id == provider_id
                    && start_date_of_row >= start_date
                    && start_date_of_row <= end_date
            })
            .cloned()
            .collect();
        Ok(Self::sorted(rows))
    }

    async fn list_history(
        &self,
        provider_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let rows = self
            .rows
            .read()
            .await
            .values()
            .filter(|appointment| {
                appointment.provider_id == provider_id && appointment.user_id == Some(user_id)
            })
            .cloned()
            .collect();

        let mut rows = Self::sorted(rows);
        rows.reverse();
        Ok(rows)
    }

    async fn apply_update(&self, patch: AppointmentPatch) -> Result<(), AppointmentError> {
        let mut rows = self.rows.write().await;

        // PostgREST PATCH on an unknown id touches no rows; mirror that.
        let Some(row) = rows.get_mut(&patch.appointment_id) else {
            return Ok(());
        };

        if let Some(user_id) = patch.user_id {
            row.user_id = Some(user_id);
        }
        if let Some(start_date_time) = patch.start_date_time {
            row.start_date_time = start_date_time;
        }
        if let Some(end_date_time) = patch.end_date_time {
            row.end_date_time = end_date_time;
        }
        if let Some(status) = patch.status {
            row.status = status;
        }
        if let Some(service_type) = patch.service_type {
            row.service_type = Some(service_type);
        }
        if let Some(comments) = patch.comments {
            row.comments = Some(comments);
        }
        row.updated_at = Utc::now();

        Ok(())
    }

    async fn cancel(&self, id: Uuid) -> Result<u64, AppointmentError> {
        let mut rows = self.rows.write().await;

        match rows.get_mut(&id) {
            Some(row) if !row.is_cancelled() => {
                row.status = status::CANCELLED.to_string();
                row.updated_at = Utc::now();
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<u64, AppointmentError> {
        match self.rows.write().await.remove(&id) {
            Some(_) => Ok(1),
            None => Ok(0),
        }
    }
}
