use aerodesk_core::{validation, Change, CoreError, CoreResult};
use aerodesk_shared::{seat_label, Airplane, Route, Seat, SeatStatus};
use serde::Serialize;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::models::{AirplaneSpec, AirplaneUpdate, SeatStatusChange};

/// Everything the inventory service owns. Only reachable through
/// [`InventoryStore`], which holds it behind one lock.
#[derive(Debug, Default)]
pub struct Fleet {
    pub(crate) airplanes: BTreeMap<u32, Airplane>,
    /// Seats per airplane in layout order (1A, 1B, ... 1F, 2A, ...).
    pub(crate) seats: BTreeMap<u32, Vec<Seat>>,
    pub(crate) routes: BTreeMap<u32, Route>,
}

impl Fleet {
    fn seat(&self, airplane_id: u32, seat_number: &str) -> CoreResult<&Seat> {
        if !self.airplanes.contains_key(&airplane_id) {
            return Err(airplane_not_found(airplane_id));
        }
        self.seats
            .get(&airplane_id)
            .and_then(|seats| seats.iter().find(|s| s.seat_number == seat_number))
            .ok_or_else(|| seat_not_found(airplane_id, seat_number))
    }

    fn seat_mut(&mut self, airplane_id: u32, seat_number: &str) -> CoreResult<&mut Seat> {
        if !self.airplanes.contains_key(&airplane_id) {
            return Err(airplane_not_found(airplane_id));
        }
        self.seats
            .get_mut(&airplane_id)
            .and_then(|seats| seats.iter_mut().find(|s| s.seat_number == seat_number))
            .ok_or_else(|| seat_not_found(airplane_id, seat_number))
    }
}

/// Counts exposed by the diagnostics endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct FleetSnapshot {
    pub airplanes: usize,
    pub airplane_ids: Vec<u32>,
    pub seats: usize,
    pub routes: usize,
    pub route_ids: Vec<u32>,
}

/// Canonical airplane, seat and route state.
///
/// Every operation takes the store lock for its whole body, so a
/// read-modify-write on a seat never interleaves with another one.
/// Queries share the lock; mutations hold it exclusively.
pub struct InventoryStore {
    pub(crate) fleet: RwLock<Fleet>,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self {
            fleet: RwLock::new(Fleet::default()),
        }
    }

    /// Registers an airplane and lays out `capacity` free seats for it.
    pub async fn add_airplane(&self, spec: AirplaneSpec) -> CoreResult<Airplane> {
        let airplane = spec.validate()?;
        let mut fleet = self.fleet.write().await;

        if fleet.airplanes.contains_key(&airplane.airplane_id) {
            return Err(CoreError::invalid(
                "airplane_id",
                format!("airplane {} already exists", airplane.airplane_id),
            ));
        }
        if fleet.airplanes.values().any(|a| a.same_spec(&airplane)) {
            return Err(CoreError::invalid(
                "airplane",
                "an airplane with the same model, manufacturer, year and capacity already exists",
            ));
        }

        let seats = (0..airplane.capacity)
            .map(|i| Seat::free(airplane.airplane_id, seat_label(i)))
            .collect();
        fleet.seats.insert(airplane.airplane_id, seats);
        fleet.airplanes.insert(airplane.airplane_id, airplane.clone());

        tracing::info!(
            airplane_id = airplane.airplane_id,
            capacity = airplane.capacity,
            "Airplane registered"
        );
        Ok(airplane)
    }

    pub async fn list_airplanes(&self) -> Vec<Airplane> {
        self.fleet.read().await.airplanes.values().cloned().collect()
    }

    pub async fn get_airplane(&self, airplane_id: u32) -> CoreResult<Airplane> {
        self.fleet
            .read()
            .await
            .airplanes
            .get(&airplane_id)
            .cloned()
            .ok_or_else(|| airplane_not_found(airplane_id))
    }

    /// Replaces model, manufacturer, year and capacity.
    ///
    /// Growing the capacity appends free seats. Shrinking drops trailing
    /// seats and is refused while any of them is booked.
    pub async fn update_airplane(
        &self,
        airplane_id: u32,
        update: AirplaneUpdate,
    ) -> CoreResult<Change<Airplane>> {
        let candidate = update.validate(airplane_id)?;
        let mut fleet = self.fleet.write().await;

        let current = fleet
            .airplanes
            .get(&airplane_id)
            .cloned()
            .ok_or_else(|| airplane_not_found(airplane_id))?;
        if current == candidate {
            return Ok(Change::Unchanged(current));
        }
        if fleet
            .airplanes
            .values()
            .any(|a| a.airplane_id != airplane_id && a.same_spec(&candidate))
        {
            return Err(CoreError::invalid(
                "airplane",
                "an airplane with the same model, manufacturer, year and capacity already exists",
            ));
        }

        let seats = fleet.seats.entry(airplane_id).or_default();
        let target = candidate.capacity as usize;
        if target < seats.len() {
            if let Some(booked) = seats[target..].iter().find(|s| s.status != SeatStatus::Free) {
                return Err(CoreError::Conflict(format!(
                    "cannot reduce capacity to {}: seat {} is {}",
                    target, booked.seat_number, booked.status
                )));
            }
            seats.truncate(target);
        } else {
            for index in seats.len()..target {
                seats.push(Seat::free(airplane_id, seat_label(index as u32)));
            }
        }
        fleet.airplanes.insert(airplane_id, candidate.clone());

        tracing::info!(airplane_id, capacity = candidate.capacity, "Airplane updated");
        Ok(Change::Applied(candidate))
    }

    /// Removes the airplane and all of its seats, returning how many seats went.
    pub async fn delete_airplane(&self, airplane_id: u32) -> CoreResult<usize> {
        let mut fleet = self.fleet.write().await;
        fleet
            .airplanes
            .remove(&airplane_id)
            .ok_or_else(|| airplane_not_found(airplane_id))?;
        let removed = fleet.seats.remove(&airplane_id).map(|s| s.len()).unwrap_or(0);

        let orphaned = fleet.routes.values().filter(|r| r.airplane_id == airplane_id).count();
        if orphaned > 0 {
            tracing::warn!(airplane_id, orphaned, "Deleted airplane is still referenced by routes");
        }
        tracing::info!(airplane_id, removed, "Airplane deleted");
        Ok(removed)
    }

    pub async fn list_seats(&self, airplane_id: u32) -> CoreResult<Vec<Seat>> {
        let fleet = self.fleet.read().await;
        if !fleet.airplanes.contains_key(&airplane_id) {
            return Err(airplane_not_found(airplane_id));
        }
        match fleet.seats.get(&airplane_id) {
            Some(seats) if !seats.is_empty() => Ok(seats.clone()),
            _ => Err(CoreError::NotFound(format!("airplane {} has no seats", airplane_id))),
        }
    }

    pub async fn seats_by_airplane(&self) -> BTreeMap<u32, Vec<Seat>> {
        self.fleet.read().await.seats.clone()
    }

    pub async fn get_seat(&self, airplane_id: u32, seat_number: &str) -> CoreResult<Seat> {
        let seat_number = validation::seat_number(seat_number)?;
        let fleet = self.fleet.read().await;
        fleet.seat(airplane_id, &seat_number).cloned()
    }

    /// Applies a seat transition. Setting the status a seat already has is a
    /// no-op; a mismatched `expected` status is a conflict.
    pub async fn update_seat_status(
        &self,
        airplane_id: u32,
        seat_number: &str,
        change: SeatStatusChange,
    ) -> CoreResult<Change<Seat>> {
        let seat_number = validation::seat_number(seat_number)?;
        let mut fleet = self.fleet.write().await;
        let seat = fleet.seat_mut(airplane_id, &seat_number)?;

        if let Some(expected) = change.expected {
            if seat.status != expected {
                return Err(CoreError::Conflict(format!(
                    "seat {} on airplane {} is {}, expected {}",
                    seat.seat_number, airplane_id, seat.status, expected
                )));
            }
        }
        if seat.status == change.status {
            return Ok(Change::Unchanged(seat.clone()));
        }

        let previous = seat.status;
        seat.status = change.status;
        tracing::info!(
            airplane_id,
            seat = %seat.seat_number,
            from = %previous,
            to = %seat.status,
            "Seat status changed"
        );
        Ok(Change::Applied(seat.clone()))
    }

    pub async fn release_seat(&self, airplane_id: u32, seat_number: &str) -> CoreResult<Change<Seat>> {
        self.update_seat_status(airplane_id, seat_number, SeatStatusChange::to(SeatStatus::Free))
            .await
    }

    /// First free seat in layout order.
    pub async fn first_free_seat(&self, airplane_id: u32) -> CoreResult<Seat> {
        let fleet = self.fleet.read().await;
        if !fleet.airplanes.contains_key(&airplane_id) {
            return Err(airplane_not_found(airplane_id));
        }
        fleet
            .seats
            .get(&airplane_id)
            .and_then(|seats| seats.iter().find(|s| s.status == SeatStatus::Free))
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("airplane {} has no free seats", airplane_id)))
    }

    pub async fn snapshot(&self) -> FleetSnapshot {
        let fleet = self.fleet.read().await;
        FleetSnapshot {
            airplanes: fleet.airplanes.len(),
            airplane_ids: fleet.airplanes.keys().copied().collect(),
            seats: fleet.seats.values().map(Vec::len).sum(),
            routes: fleet.routes.len(),
            route_ids: fleet.routes.keys().copied().collect(),
        }
    }
}

impl Default for InventoryStore {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn airplane_not_found(airplane_id: u32) -> CoreError {
    CoreError::NotFound(format!("airplane {} not found", airplane_id))
}

fn seat_not_found(airplane_id: u32, seat_number: &str) -> CoreError {
    CoreError::NotFound(format!("seat {} not found on airplane {}", seat_number, airplane_id))
}
