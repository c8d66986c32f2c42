use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use calendar_cell::router::calendar_routes;
use calendar_cell::CalendarState;

pub fn create_router(state: Arc<CalendarState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Provider Calendar API is running!" }))
        .nest("/appointments", calendar_routes(state))
}
