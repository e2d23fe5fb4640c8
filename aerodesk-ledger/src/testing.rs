//! Fixtures shared by the workflow tests.

use aerodesk_core::{SeatInventory, UpstreamError};
use aerodesk_inventory::{AirplaneSpec, InventoryStore, RouteSpec};
use aerodesk_shared::{Currency, Masked, ReservationStatus, Route, Seat, SeatStatus};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::manager::LedgerBook;
use crate::models::{NewReservation, ReservationEdit};
use crate::orchestrator::BookingOrchestrator;

/// Airplane 1 with two seats (1A, 1B) flying route 1, and an orchestrator
/// wired straight to that store.
pub async fn fixture() -> (Arc<InventoryStore>, BookingOrchestrator) {
    let store = Arc::new(InventoryStore::new());
    store
        .add_airplane(AirplaneSpec {
            airplane_id: 1,
            model: "E190".into(),
            manufacturer: "Embraer".into(),
            year: 2012,
            capacity: 2,
        })
        .await
        .unwrap();
    store
        .add_route(RouteSpec {
            airplane_route_id: 1,
            flight_number: "AV-0630".into(),
            departure: "San José".into(),
            departure_time: "Mayo 10, 2025 - 07:00:00".into(),
            arrival: "Bogotá".into(),
            arrival_time: "Mayo 10, 2025 - 09:40:00".into(),
            price: 300,
            currency: Currency::USD,
            airplane_id: 1,
            flight_time: None,
        })
        .await
        .unwrap();

    let orchestrator = BookingOrchestrator::new(Arc::new(LedgerBook::new()), store.clone());
    (store, orchestrator)
}

pub fn booking(seat: &str) -> NewReservation {
    NewReservation {
        passport_number: Masked::new("C0482913".into()),
        full_name: "Ana Mora".into(),
        email: "ana@example.com".into(),
        phone_number: "+506 8888 0000".into(),
        emergency_contact_name: "Luis Mora".into(),
        emergency_contact_phone: "+506 8888 1111".into(),
        airplane_id: 1,
        airplane_route_id: 1,
        seat_number: seat.into(),
        status: ReservationStatus::Reserved,
    }
}

/// Same contact details as [`booking`], on `seat`.
pub fn contact_edit(seat: &str) -> ReservationEdit {
    ReservationEdit {
        seat_number: seat.into(),
        email: "ana@example.com".into(),
        phone_number: "+506 8888 0000".into(),
        emergency_contact_name: "Luis Mora".into(),
        emergency_contact_phone: "+506 8888 1111".into(),
    }
}

/// Delegates to a real store but reports the inventory as unreachable for
/// writes of chosen statuses, optionally only for one seat. Status writes
/// can also be slowed down.
pub struct FlakyInventory {
    store: Arc<InventoryStore>,
    failing: Mutex<Vec<SeatStatus>>,
    seat: Mutex<Option<String>>,
    delay: Mutex<Option<Duration>>,
}

impl FlakyInventory {
    pub fn new(store: Arc<InventoryStore>) -> Self {
        Self {
            store,
            failing: Mutex::new(Vec::new()),
            seat: Mutex::new(None),
            delay: Mutex::new(None),
        }
    }

    pub fn fail_status(&self, status: SeatStatus) {
        self.failing.lock().unwrap().push(status);
    }

    pub fn fail_seat(&self, seat_number: &str) {
        *self.seat.lock().unwrap() = Some(seat_number.to_string());
    }

    pub fn delay_writes(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    fn should_fail(&self, seat_number: &str, status: SeatStatus) -> bool {
        let seat_matches = self
            .seat
            .lock()
            .unwrap()
            .as_deref()
            .map_or(true, |only| only == seat_number);
        seat_matches && self.failing.lock().unwrap().contains(&status)
    }
}

#[async_trait]
impl SeatInventory for FlakyInventory {
    async fn route(&self, airplane_route_id: u32) -> Result<Option<Route>, UpstreamError> {
        self.store.route(airplane_route_id).await
    }

    async fn seats(&self, airplane_id: u32) -> Result<Option<Vec<Seat>>, UpstreamError> {
        self.store.seats(airplane_id).await
    }

    async fn set_seat_status(
        &self,
        airplane_id: u32,
        seat_number: &str,
        status: SeatStatus,
        expected: Option<SeatStatus>,
    ) -> Result<Seat, UpstreamError> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.should_fail(seat_number, status) {
            return Err(UpstreamError::Unavailable("connection refused".into()));
        }
        self.store
            .set_seat_status(airplane_id, seat_number, status, expected)
            .await
    }

    async fn free_seat(&self, airplane_id: u32, seat_number: &str) -> Result<Seat, UpstreamError> {
        if self.should_fail(seat_number, SeatStatus::Free) {
            return Err(UpstreamError::Unavailable("connection refused".into()));
        }
        self.store.free_seat(airplane_id, seat_number).await
    }
}
