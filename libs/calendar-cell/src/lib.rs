pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod state;
pub mod store;

pub use router::calendar_routes;
pub use state::CalendarState;
