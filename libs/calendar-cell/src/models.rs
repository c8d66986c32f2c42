// libs/calendar-cell/src/models.rs
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==============================================================================
// CORE CALENDAR MODELS
// ==============================================================================

/// Status values this service writes itself. The column is free text, so
/// stored rows may carry other states (e.g. "completed"); only `CANCELLED`
/// changes how the scheduling engine treats a row.
pub mod status {
    pub const SCHEDULED: &str = "scheduled";
    pub const CANCELLED: &str = "cancelled";
    pub const BLOCKED: &str = "blocked";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub provider_id: Uuid,
    /// `None` marks the row as a provider-side block (lunch break,
    /// vacation day) rather than a client booking.
    pub user_id: Option<Uuid>,
    pub start_date_time: NaiveDateTime,
    pub end_date_time: NaiveDateTime,
    pub status: String,
    pub service_type: Option<String>,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Cancelled rows are kept for history but no longer occupy calendar
    /// space.
    pub fn is_cancelled(&self) -> bool {
        self.status == status::CANCELLED
    }

    pub fn is_block(&self) -> bool {
        self.user_id.is_none()
    }
}

/// A maximal free sub-interval of a provider's day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Last representable instant of a day. The trailing free interval of an
/// availability sweep ends here, not at the next midnight.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_nano_opt(23, 59, 59, 999_999_999)
        .expect("23:59:59.999999999 is a valid time of day")
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub provider_id: Uuid,
    pub user_id: Option<Uuid>,
    pub start_date_time: NaiveDateTime,
    pub end_date_time: NaiveDateTime,
    pub status: Option<String>,
    pub service_type: Option<String>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBlockRequest {
    pub provider_id: Option<Uuid>,
    pub start_date_time: NaiveDateTime,
    pub end_date_time: NaiveDateTime,
}

/// A daily time-of-day range expanded into one block per date across an
/// inclusive date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRecurringBlockRequest {
    pub provider_id: Option<Uuid>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Fixed-rule variant: the range is today through one year from today.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateYearlyBlockRequest {
    pub provider_id: Option<Uuid>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Partial update. `appointment_id` is required; every other field is
/// applied only when present. Supplying either time bound re-triggers
/// conflict validation with the missing bound backfilled from the stored
/// row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub appointment_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub start_date_time: Option<NaiveDateTime>,
    pub end_date_time: Option<NaiveDateTime>,
    pub status: Option<String>,
    pub service_type: Option<String>,
    pub comments: Option<String>,
}

// ==============================================================================
// RECURRING BLOCK REPORTING
// ==============================================================================

/// Outcome of a recurring-block expansion. Expansion is not transactional:
/// blocks for non-conflicting dates are persisted even when other dates
/// conflict, and every conflicting date is reported.
#[derive(Debug, Clone, Serialize)]
pub struct RecurringBlockReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_dates: Vec<NaiveDate>,
    pub conflict_dates: Vec<NaiveDate>,
}

impl RecurringBlockReport {
    pub fn has_conflicts(&self) -> bool {
        !self.conflict_dates.is_empty()
    }

    /// One line per conflicting date, or `None` when every date was
    /// blocked out.
    pub fn conflict_summary(&self) -> Option<String> {
        if self.conflict_dates.is_empty() {
            return None;
        }

        let mut message = String::from("Conflicts found on the following dates: \n");
        for date in &self.conflict_dates {
            message.push_str(&format!("{}\n", date));
        }
        Some(message)
    }

    pub fn summary(&self) -> String {
        self.conflict_summary().unwrap_or_else(|| {
            format!(
                "Recurring block created successfully from {} to {}",
                self.start_date, self.end_date
            )
        })
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("The selected time slot is not available or conflicts with an existing appointment.")]
    ConflictDetected,

    #[error("Invalid appointment time: {0}")]
    InvalidTime(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}
