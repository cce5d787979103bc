pub mod appointment;
pub mod conflict;
pub mod scheduler;

pub use appointment::AppointmentService;
pub use conflict::ConflictDetectionService;
pub use scheduler::AppointmentScheduler;
