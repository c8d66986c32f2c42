use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use calendar_cell::models::Appointment;
use calendar_cell::store::{AppointmentStore, InMemoryAppointmentStore, NewAppointment};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

pub fn dt(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    date(year, month, day)
        .and_hms_opt(hour, minute, 0)
        .expect("valid test datetime")
}

/// Seed a row directly through the store, bypassing the booking service
/// and its conflict check. Lets tests build pathological calendars
/// (overlapping rows, cancelled rows) on purpose.
pub async fn seed(
    store: &InMemoryAppointmentStore,
    provider_id: Uuid,
    user_id: Option<Uuid>,
    start: NaiveDateTime,
    end: NaiveDateTime,
    status: &str,
) -> Appointment {
    store
        .insert(NewAppointment {
            provider_id,
            user_id,
            start_date_time: start,
            end_date_time: end,
            status: status.to_string(),
            service_type: Some("consultation".to_string()),
            comments: None,
        })
        .await
        .expect("failed to seed appointment")
}
