use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Seat columns, left to right.
pub const SEAT_COLUMNS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

/// Label of the seat at `index` in layout order: 0 → "1A", 5 → "1F", 6 → "2A".
pub fn seat_label(index: u32) -> String {
    let columns = SEAT_COLUMNS.len() as u32;
    let row = index / columns + 1;
    let column = SEAT_COLUMNS[(index % columns) as usize];
    format!("{}{}", row, column)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airplane {
    pub airplane_id: u32,
    pub model: String,
    pub manufacturer: String,
    pub year: u32,
    pub capacity: u32,
}

impl Airplane {
    /// Two airplanes with the same model, manufacturer, year and capacity are
    /// treated as duplicates regardless of id.
    pub fn same_spec(&self, other: &Airplane) -> bool {
        self.model == other.model
            && self.manufacturer == other.manufacturer
            && self.year == other.year
            && self.capacity == other.capacity
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeatStatus {
    #[serde(alias = "Libre")]
    Free,
    #[serde(alias = "Reservado")]
    Reserved,
    #[serde(alias = "Pagado")]
    Paid,
}

impl SeatStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatStatus::Free => "Free",
            SeatStatus::Reserved => "Reserved",
            SeatStatus::Paid => "Paid",
        }
    }
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeatStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Free" | "Libre" => Ok(SeatStatus::Free),
            "Reserved" | "Reservado" => Ok(SeatStatus::Reserved),
            "Paid" | "Pagado" => Ok(SeatStatus::Paid),
            other => Err(format!("unknown seat status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub airplane_id: u32,
    pub seat_number: String,
    pub status: SeatStatus,
}

impl Seat {
    pub fn free(airplane_id: u32, seat_number: String) -> Self {
        Self {
            airplane_id,
            seat_number,
            status: SeatStatus::Free,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(alias = "Dolares")]
    USD,
    #[serde(alias = "Colones")]
    CRC,
    #[serde(alias = "Euros")]
    EUR,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Currency::USD => "USD",
            Currency::CRC => "CRC",
            Currency::EUR => "EUR",
        };
        f.write_str(code)
    }
}

/// A scheduled flight flown by one airplane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub airplane_route_id: u32,
    pub flight_number: String,
    pub departure: String,
    #[serde(with = "crate::schedule::wire")]
    pub departure_time: NaiveDateTime,
    pub arrival: String,
    #[serde(with = "crate::schedule::wire")]
    pub arrival_time: NaiveDateTime,
    pub flight_time: String,
    pub price: u32,
    pub currency: Currency,
    pub airplane_id: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_label_layout() {
        assert_eq!(seat_label(0), "1A");
        assert_eq!(seat_label(5), "1F");
        assert_eq!(seat_label(6), "2A");
        assert_eq!(seat_label(13), "3B");
    }

    #[test]
    fn test_status_accepts_legacy_spelling() {
        let status: SeatStatus = serde_json::from_str("\"Reservado\"").unwrap();
        assert_eq!(status, SeatStatus::Reserved);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"Reserved\"");
        assert_eq!("Libre".parse::<SeatStatus>().unwrap(), SeatStatus::Free);
        assert!("Booked".parse::<SeatStatus>().is_err());
    }

    #[test]
    fn test_currency_aliases() {
        let currency: Currency = serde_json::from_str("\"Colones\"").unwrap();
        assert_eq!(currency, Currency::CRC);
        assert_eq!(currency.to_string(), "CRC");
    }
}
