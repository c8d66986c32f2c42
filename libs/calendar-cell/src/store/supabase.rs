// libs/calendar-cell/src/store/supabase.rs
use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{status, start_of_day, Appointment, AppointmentError};
use crate::store::{AppointmentPatch, AppointmentStore, NewAppointment};

/// PostgREST-backed store over the `appointments` table.
pub struct SupabaseAppointmentStore {
    supabase: SupabaseClient,
}

impl SupabaseAppointmentStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    async fn fetch_rows(&self, path: &str) -> Result<Vec<Appointment>, AppointmentError> {
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, path, None)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Appointment>, _>>()
            .map_err(|e| AppointmentError::Database(format!("Failed to parse appointments: {}", e)))
    }

    /// Rows whose start time falls inside `[start_date, end_date]`,
    /// expressed as a half-open window ending at the midnight after
    /// `end_date`.
    fn date_window_path(provider_id: Uuid, start_date: NaiveDate, end_date: NaiveDate) -> String {
        let window_start = start_of_day(start_date);
        let window_end = start_of_day(end_date + Days::new(1));

        format!(
            "/rest/v1/appointments?provider_id=eq.{}&start_date_time=gte.{}&start_date_time=lt.{}&order=start_date_time.asc",
            provider_id,
            window_start.format("%Y-%m-%dT%H:%M:%S"),
            window_end.format("%Y-%m-%dT%H:%M:%S")
        )
    }
}

#[async_trait]
impl AppointmentStore for SupabaseAppointmentStore {
    async fn insert(&self, appointment: NewAppointment) -> Result<Appointment, AppointmentError> {
        debug!(
            "Inserting appointment for provider {} from {} to {}",
            appointment.provider_id, appointment.start_date_time, appointment.end_date_time
        );

        let now = Utc::now();
        let row = json!({
            "provider_id": appointment.provider_id,
            "user_id": appointment.user_id,
            "start_date_time": appointment.start_date_time,
            "end_date_time": appointment.end_date_time,
            "status": appointment.status,
            "service_type": appointment.service_type,
            "comments": appointment.comments,
            "created_at": now,
            "updated_at": now,
        });

        let result: Vec<Value> = self
            .supabase
            .request_returning(Method::POST, "/rest/v1/appointments", Some(row))
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;

        let created = result
            .into_iter()
            .next()
            .ok_or_else(|| AppointmentError::Database("Failed to create appointment".to_string()))?;

        serde_json::from_value(created)
            .map_err(|e| AppointmentError::Database(format!("Failed to parse appointment: {}", e)))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Appointment>, AppointmentError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", id);
        let rows = self.fetch_rows(&path).await?;
        Ok(rows.into_iter().next())
    }

    async fn list_by_provider(&self, provider_id: Uuid) -> Result<Vec<Appointment>, AppointmentError> {
        let path = format!(
            "/rest/v1/appointments?provider_id=eq.{}&order=start_date_time.asc",
            provider_id
        );
        self.fetch_rows(&path).await
    }

    async fn list_by_provider_and_date(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        self.fetch_rows(&Self::date_window_path(provider_id, date, date)).await
    }

    async fn list_by_provider_in_range(
        &self,
        provider_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        self.fetch_rows(&Self::date_window_path(provider_id, start_date, end_date)).await
    }

    async fn list_history(
        &self,
        provider_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let path = format!(
            "/rest/v1/appointments?provider_id=eq.{}&user_id=eq.{}&order=start_date_time.desc",
            provider_id, user_id
        );
        self.fetch_rows(&path).await
    }

    async fn apply_update(&self, patch: AppointmentPatch) -> Result<(), AppointmentError> {
        debug!("Updating appointment {}", patch.appointment_id);

        let mut update_data = serde_json::Map::new();

        if let Some(user_id) = patch.user_id {
            update_data.insert("user_id".to_string(), json!(user_id));
        }
        if let Some(start_date_time) = patch.start_date_time {
            update_data.insert("start_date_time".to_string(), json!(start_date_time));
        }
        if let Some(end_date_time) = patch.end_date_time {
            update_data.insert("end_date_time".to_string(), json!(end_date_time));
        }
        if let Some(status) = patch.status {
            update_data.insert("status".to_string(), json!(status));
        }
        if let Some(service_type) = patch.service_type {
            update_data.insert("service_type".to_string(), json!(service_type));
        }
        if let Some(comments) = patch.comments {
            update_data.insert("comments".to_string(), json!(comments));
        }

        update_data.insert("updated_at".to_string(), json!(Utc::now()));

        let path = format!("/rest/v1/appointments?id=eq.{}", patch.appointment_id);
        let _: Vec<Value> = self
            .supabase
            .request_returning(Method::PATCH, &path, Some(Value::Object(update_data)))
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;

        Ok(())
    }

    async fn cancel(&self, id: Uuid) -> Result<u64, AppointmentError> {
        // The status filter makes cancellation idempotent: a second cancel
        // matches no rows.
        let path = format!(
            "/rest/v1/appointments?id=eq.{}&status=neq.{}",
            id,
            status::CANCELLED
        );
        let body = json!({
            "status": status::CANCELLED,
            "updated_at": Utc::now(),
        });

        let result: Vec<Value> = self
            .supabase
            .request_returning(Method::PATCH, &path, Some(body))
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;

        Ok(result.len() as u64)
    }

    async fn delete(&self, id: Uuid) -> Result<u64, AppointmentError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", id);

        let result: Vec<Value> = self
            .supabase
            .request_returning(Method::DELETE, &path, None)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;

        Ok(result.len() as u64)
    }
}
