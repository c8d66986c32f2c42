// libs/calendar-cell/src/store/mod.rs
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::models::{status, Appointment, AppointmentError};

pub mod memory;
pub mod supabase;

pub use memory::InMemoryAppointmentStore;
pub use supabase::SupabaseAppointmentStore;

/// Field set the store needs to materialize a new appointment row. The id
/// and audit stamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub provider_id: Uuid,
    pub user_id: Option<Uuid>,
    pub start_date_time: NaiveDateTime,
    pub end_date_time: NaiveDateTime,
    pub status: String,
    pub service_type: Option<String>,
    pub comments: Option<String>,
}

impl NewAppointment {
    pub fn block(provider_id: Uuid, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            provider_id,
            user_id: None,
            start_date_time: start,
            end_date_time: end,
            status: status::BLOCKED.to_string(),
            service_type: Some(status::BLOCKED.to_string()),
            comments: Some(status::BLOCKED.to_string()),
        }
    }
}

/// Partial update addressed by id; only `Some` fields are written.
#[derive(Debug, Clone)]
pub struct AppointmentPatch {
    pub appointment_id: Uuid,
    pub user_id: Option<Uuid>,
    pub start_date_time: Option<NaiveDateTime>,
    pub end_date_time: Option<NaiveDateTime>,
    pub status: Option<String>,
    pub service_type: Option<String>,
    pub comments: Option<String>,
}

/// Persistence contract the scheduling engine depends on. Listings are
/// ordered by start time ascending; day and range queries select rows by
/// their start time.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn insert(&self, appointment: NewAppointment) -> Result<Appointment, AppointmentError>;

    async fn get(&self, id: Uuid) -> Result<Option<Appointment>, AppointmentError>;

    async fn list_by_provider(&self, provider_id: Uuid) -> Result<Vec<Appointment>, AppointmentError>;

    async fn list_by_provider_and_date(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, AppointmentError>;

    async fn list_by_provider_in_range(
        &self,
        provider_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Appointment>, AppointmentError>;

    async fn list_history(
        &self,
        provider_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<Appointment>, AppointmentError>;

    async fn apply_update(&self, patch: AppointmentPatch) -> Result<(), AppointmentError>;

    /// Flip the row to cancelled, keeping it for history. Returns the rows
    /// affected: 0 when the id is unknown or the row was already
    /// cancelled.
    async fn cancel(&self, id: Uuid) -> Result<u64, AppointmentError>;

    /// Hard-remove the row. Returns the rows affected (0 or 1).
    async fn delete(&self, id: Uuid) -> Result<u64, AppointmentError>;
}
