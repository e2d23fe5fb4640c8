use super::fleet::{Currency, SeatStatus};
use crate::pii::Masked;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationStatus {
    #[serde(alias = "Reservado")]
    Reserved,
    #[serde(alias = "Pagado")]
    Paid,
}

impl ReservationStatus {
    /// Inventory status the reserved seat must carry while the reservation
    /// is in this state.
    pub fn seat_status(&self) -> SeatStatus {
        match self {
            ReservationStatus::Reserved => SeatStatus::Reserved,
            ReservationStatus::Paid => SeatStatus::Paid,
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.seat_status().as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub reservation_id: u64,
    pub reservation_code: String,
    pub passport_number: Masked<String>,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub airplane_id: u32,
    pub airplane_route_id: u32,
    pub seat_number: String,
    pub flight_number: String,
    pub price: u32,
    pub currency: Currency,
    pub status: ReservationStatus,
    #[serde(with = "crate::schedule::wire")]
    pub issued_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(alias = "Tarjeta")]
    Card,
    PayPal,
    #[serde(alias = "Transferencia")]
    Transfer,
    #[serde(alias = "Efectivo")]
    Cash,
    SINPE,
}

impl PaymentMethod {
    /// Methods a new payment may be opened with. Cash and SINPE are only
    /// recorded by later corrections.
    pub fn accepted_at_checkout(&self) -> bool {
        matches!(
            self,
            PaymentMethod::Card | PaymentMethod::PayPal | PaymentMethod::Transfer
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(alias = "Pagado")]
    Paid,
}

/// A settled payment. Reservation fields are copied at creation and are not
/// kept in sync afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub payment_id: String,
    pub reservation_id: u64,
    pub reservation_code: String,
    pub passport_number: Masked<String>,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub airplane_id: u32,
    pub airplane_route_id: u32,
    pub seat_number: String,
    pub flight_number: String,
    pub amount: u32,
    pub currency: Currency,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,
    #[serde(with = "crate::schedule::wire")]
    pub payment_date: NaiveDateTime,
    pub transaction_reference: String,
}
