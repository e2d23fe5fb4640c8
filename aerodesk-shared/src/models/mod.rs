pub mod booking;
pub mod fleet;

pub use booking::{Payment, PaymentMethod, PaymentStatus, Reservation, ReservationStatus};
pub use fleet::{seat_label, Airplane, Currency, Route, Seat, SeatStatus, SEAT_COLUMNS};
