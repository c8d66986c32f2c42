// libs/calendar-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers;
use crate::state::CalendarState;

pub fn calendar_routes(state: Arc<CalendarState>) -> Router {
    Router::new()
        // Appointment lifecycle
        .route("/", post(handlers::create_appointment))
        .route("/blocks", post(handlers::create_block))
        .route("/blocks/recurring", post(handlers::create_recurring_block))
        .route(
            "/blocks/recurring/yearly",
            post(handlers::create_recurring_block_in_one_year),
        )
        .route("/blocks/{appointment_id}", delete(handlers::delete_block))
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route("/{appointment_id}", put(handlers::update_appointment))
        .route("/{appointment_id}/cancel", put(handlers::cancel_appointment))
        // Listings
        .route("/history", get(handlers::get_appointment_history))
        .route(
            "/providers/{provider_id}",
            get(handlers::get_provider_appointments),
        )
        .route(
            "/providers/{provider_id}/date/{date}",
            get(handlers::get_provider_appointments_by_date),
        )
        .route(
            "/providers/{provider_id}/range",
            get(handlers::get_provider_appointments_in_range),
        )
        .route(
            "/providers/{provider_id}/available/date/{date}",
            get(handlers::get_available_intervals),
        )
        .with_state(state)
}
