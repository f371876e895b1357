// Export components
pub mod calendar;
pub mod events;
pub mod google_calendar;
pub mod notifications;
pub mod redis_service;

pub use calendar::CalendarState;
pub use events::EventStore;
pub use notifications::Notification;
