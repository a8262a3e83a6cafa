pub mod flow;
pub mod appointment;

pub use flow::{BookingFlow, BookingStep, RescheduleFlow};
pub use appointment::AppointmentService;
