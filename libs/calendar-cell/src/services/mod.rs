pub mod availability;
pub mod booking;
pub mod conflict;
pub mod consistency;
pub mod recurrence;

pub use availability::AvailabilityService;
pub use booking::AppointmentBookingService;
pub use conflict::ConflictDetectionService;
pub use consistency::ProviderLocks;
pub use recurrence::RecurringBlockService;
