pub mod identifiers;
pub mod manager;
pub mod models;
pub mod orchestrator;
pub mod saga;
pub mod settlement;

#[cfg(test)]
mod testing;

pub use manager::LedgerBook;
pub use models::{NewPayment, NewReservation, PaymentEdit, ReservationEdit};
pub use orchestrator::BookingOrchestrator;
