// libs/calendar-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{
    AppointmentError, CreateAppointmentRequest, CreateBlockRequest, CreateRecurringBlockRequest,
    CreateYearlyBlockRequest, UpdateAppointmentRequest,
};
use crate::services::{AppointmentBookingService, AvailabilityService, RecurringBlockService};
use crate::state::CalendarState;

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub provider_id: Uuid,
    pub user_id: Uuid,
}

fn map_appointment_error(error: AppointmentError) -> AppError {
    match error {
        AppointmentError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        AppointmentError::ConflictDetected => AppError::Conflict(
            "The selected time slot is not available or conflicts with an existing appointment."
                .to_string(),
        ),
        AppointmentError::InvalidTime(msg) => AppError::BadRequest(msg),
        AppointmentError::Validation(msg) => AppError::ValidationError(msg),
        AppointmentError::Database(msg) => AppError::Database(msg),
    }
}

// ==============================================================================
// APPOINTMENT LIFECYCLE HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<CalendarState>>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let booking_service =
        AppointmentBookingService::new(Arc::clone(&state.store), Arc::clone(&state.locks));

    let appointment = booking_service
        .create_appointment(request)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment created successfully"
    })))
}

#[axum::debug_handler]
pub async fn create_block(
    State(state): State<Arc<CalendarState>>,
    Json(request): Json<CreateBlockRequest>,
) -> Result<Json<Value>, AppError> {
    let booking_service =
        AppointmentBookingService::new(Arc::clone(&state.store), Arc::clone(&state.locks));

    let block = booking_service
        .create_block(request)
        .await
        .map_err(|e| match e {
            AppointmentError::ConflictDetected => AppError::Conflict(
                "The selected time slot is not available or conflicts with an existing \
                 appointment. To block this time, please cancel the conflicting appointment \
                 or block."
                    .to_string(),
            ),
            other => map_appointment_error(other),
        })?;

    Ok(Json(json!({
        "success": true,
        "block": block,
        "message": "Block created successfully"
    })))
}

#[axum::debug_handler]
pub async fn create_recurring_block(
    State(state): State<Arc<CalendarState>>,
    Json(request): Json<CreateRecurringBlockRequest>,
) -> Result<Json<Value>, AppError> {
    let recurrence_service =
        RecurringBlockService::new(Arc::clone(&state.store), Arc::clone(&state.locks));

    let report = recurrence_service
        .create_recurring_block(request)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "success": !report.has_conflicts(),
        "message": report.summary(),
        "conflict_dates": report.conflict_dates
    })))
}

#[axum::debug_handler]
pub async fn create_recurring_block_in_one_year(
    State(state): State<Arc<CalendarState>>,
    Json(request): Json<CreateYearlyBlockRequest>,
) -> Result<Json<Value>, AppError> {
    let recurrence_service =
        RecurringBlockService::new(Arc::clone(&state.store), Arc::clone(&state.locks));

    let report = recurrence_service
        .create_recurring_block_in_one_year(request)
        .await
        .map_err(map_appointment_error)?;

    let message = report
        .conflict_summary()
        .unwrap_or_else(|| "Yearly recurring block created successfully.".to_string());

    Ok(Json(json!({
        "success": !report.has_conflicts(),
        "message": message,
        "conflict_dates": report.conflict_dates
    })))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<CalendarState>>,
    Path(appointment_id): Path<Uuid>,
    Json(mut request): Json<UpdateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    request.appointment_id = Some(appointment_id);

    let booking_service =
        AppointmentBookingService::new(Arc::clone(&state.store), Arc::clone(&state.locks));

    let appointment = booking_service
        .update_appointment(request)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment updated successfully"
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<CalendarState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let booking_service =
        AppointmentBookingService::new(Arc::clone(&state.store), Arc::clone(&state.locks));

    let cancelled = booking_service
        .cancel_appointment(appointment_id)
        .await
        .map_err(map_appointment_error)?;

    if cancelled {
        Ok(Json(json!({
            "success": true,
            "message": "Appointment cancelled successfully."
        })))
    } else {
        Err(AppError::BadRequest(
            "Appointment not found or already cancelled.".to_string(),
        ))
    }
}

#[axum::debug_handler]
pub async fn delete_block(
    State(state): State<Arc<CalendarState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let booking_service =
        AppointmentBookingService::new(Arc::clone(&state.store), Arc::clone(&state.locks));

    let deleted = booking_service
        .delete_block(appointment_id)
        .await
        .map_err(map_appointment_error)?;

    if deleted {
        Ok(Json(json!({
            "success": true,
            "message": "Block deleted successfully."
        })))
    } else {
        Err(AppError::BadRequest(
            "Block not found or already deleted.".to_string(),
        ))
    }
}

// ==============================================================================
// READ-SIDE HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<CalendarState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let booking_service =
        AppointmentBookingService::new(Arc::clone(&state.store), Arc::clone(&state.locks));

    let appointment = booking_service
        .get_appointment(appointment_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({ "appointment": appointment })))
}

#[axum::debug_handler]
pub async fn get_provider_appointments(
    State(state): State<Arc<CalendarState>>,
    Path(provider_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let booking_service =
        AppointmentBookingService::new(Arc::clone(&state.store), Arc::clone(&state.locks));

    let appointments = booking_service
        .appointments_by_provider(provider_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({ "appointments": appointments })))
}

#[axum::debug_handler]
pub async fn get_provider_appointments_by_date(
    State(state): State<Arc<CalendarState>>,
    Path((provider_id, date)): Path<(Uuid, NaiveDate)>,
) -> Result<Json<Value>, AppError> {
    let booking_service =
        AppointmentBookingService::new(Arc::clone(&state.store), Arc::clone(&state.locks));

    let appointments = booking_service
        .appointments_by_provider_and_date(provider_id, date)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({ "appointments": appointments })))
}

#[axum::debug_handler]
pub async fn get_provider_appointments_in_range(
    State(state): State<Arc<CalendarState>>,
    Path(provider_id): Path<Uuid>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<Value>, AppError> {
    let booking_service =
        AppointmentBookingService::new(Arc::clone(&state.store), Arc::clone(&state.locks));

    let appointments = booking_service
        .appointments_within_date_range(provider_id, range.start_date, range.end_date)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({ "appointments": appointments })))
}

#[axum::debug_handler]
pub async fn get_available_intervals(
    State(state): State<Arc<CalendarState>>,
    Path((provider_id, date)): Path<(Uuid, NaiveDate)>,
) -> Result<Json<Value>, AppError> {
    let availability_service = AvailabilityService::new(Arc::clone(&state.store));

    let intervals = availability_service
        .available_intervals(provider_id, date)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({ "available_intervals": intervals })))
}

#[axum::debug_handler]
pub async fn get_appointment_history(
    State(state): State<Arc<CalendarState>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Value>, AppError> {
    let booking_service =
        AppointmentBookingService::new(Arc::clone(&state.store), Arc::clone(&state.locks));

    let history = booking_service
        .appointment_history(query.provider_id, query.user_id)
        .await
        .map_err(map_appointment_error)?;

    if history.is_empty() {
        return Ok(Json(json!({
            "message": "No appointment history found for the given provider and user."
        })));
    }

    Ok(Json(json!({ "history": history })))
}
