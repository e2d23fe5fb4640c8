use aerodesk_core::{availability, validation, Change, CoreError, CoreResult, SeatInventory};
use aerodesk_shared::{schedule, Payment, Reservation, ReservationStatus, SeatStatus};
use std::sync::Arc;

use crate::manager::{reservation_not_found, LedgerBook};
use crate::models::{NewReservation, ReservationEdit};
use crate::saga::{Compensation, Saga};

/// Runs reservation and payment workflows against the ledger's own records
/// and the remote seat inventory.
///
/// No ledger lock is held while the inventory is being called, so concurrent
/// workflows interleave at every remote step. Double booking is prevented by
/// the inventory's conditional Free→Reserved write.
pub struct BookingOrchestrator {
    pub(crate) book: Arc<LedgerBook>,
    pub(crate) inventory: Arc<dyn SeatInventory>,
}

impl BookingOrchestrator {
    pub fn new(book: Arc<LedgerBook>, inventory: Arc<dyn SeatInventory>) -> Self {
        Self { book, inventory }
    }

    pub fn book(&self) -> &LedgerBook {
        &self.book
    }

    /// Creates a reservation and flips its seat to Reserved.
    ///
    /// The record is persisted only after the inventory accepted the seat
    /// write, so a failed call leaves nothing behind in the ledger.
    pub async fn create_reservation(&self, request: NewReservation) -> CoreResult<Reservation> {
        let target = request.validate()?;

        // 1. Route must exist and be flown by the requested airplane
        let route = availability::route_for_airplane(
            self.inventory.as_ref(),
            target.airplane_route_id,
            target.airplane_id,
        )
        .await?;

        // 2. Seat must exist and be free right now
        availability::ensure_seat_free(self.inventory.as_ref(), target.airplane_id, &target.seat_number)
            .await?;

        // 3. Identity
        let (reservation_id, reservation_code) = self.book.allocate_identity().await;
        let reservation = Reservation {
            reservation_id,
            reservation_code,
            passport_number: request.passport_number,
            full_name: request.full_name.trim().to_string(),
            email: request.email.trim().to_string(),
            phone_number: request.phone_number.trim().to_string(),
            emergency_contact_name: request.emergency_contact_name.trim().to_string(),
            emergency_contact_phone: request.emergency_contact_phone.trim().to_string(),
            airplane_id: target.airplane_id,
            airplane_route_id: route.airplane_route_id,
            seat_number: target.seat_number,
            flight_number: route.flight_number,
            price: route.price,
            currency: route.currency,
            status: ReservationStatus::Reserved,
            issued_at: schedule::now(),
        };

        // 4. Claim the seat; only one concurrent claimant can win this
        self.inventory
            .set_seat_status(
                reservation.airplane_id,
                &reservation.seat_number,
                SeatStatus::Reserved,
                Some(SeatStatus::Free),
            )
            .await
            .map_err(|e| e.into_core("reserve seat"))?;

        // 5. Persist
        let reservation = self.book.insert_reservation(reservation).await;
        tracing::info!(
            reservation_id = reservation.reservation_id,
            code = %reservation.reservation_code,
            airplane_id = reservation.airplane_id,
            seat = %reservation.seat_number,
            "Reservation created"
        );
        Ok(reservation)
    }

    /// Changes the seat and contact details of a reservation.
    ///
    /// A seat change frees the old seat and claims the new one. If the claim
    /// fails the old seat is put back before the error is returned.
    pub async fn edit_reservation(
        &self,
        code: &str,
        edit: ReservationEdit,
    ) -> CoreResult<Change<Reservation>> {
        let code = validation::reservation_code(code)?;
        let edit = edit.validate()?;
        let current = self
            .book
            .reservation_by_code(&code)
            .await
            .ok_or_else(|| CoreError::NotFound(format!("reservation {} not found", code)))?;

        if edit.matches(&current) {
            return Ok(Change::Unchanged(current));
        }

        if edit.seat_number != current.seat_number {
            self.move_seat(&current, &edit.seat_number).await?;
        }

        match self
            .book
            .update_reservation(current.reservation_id, |r| edit.apply(r))
            .await
        {
            Ok(updated) => {
                tracing::info!(
                    reservation_id = updated.reservation_id,
                    seat = %updated.seat_number,
                    "Reservation updated"
                );
                Ok(Change::Applied(updated))
            }
            Err(err) => {
                // Deleted while the seat was being moved; the new seat has no owner.
                if edit.seat_number != current.seat_number {
                    let mut cleanup = Saga::new("orphaned seat change");
                    cleanup.record(Compensation::RestoreSeat {
                        airplane_id: current.airplane_id,
                        seat_number: edit.seat_number.clone(),
                        status: SeatStatus::Free,
                    });
                    return Err(cleanup.unwind(self.inventory.as_ref(), &self.book, err).await);
                }
                Err(err)
            }
        }
    }

    async fn move_seat(&self, current: &Reservation, new_seat: &str) -> CoreResult<()> {
        let airplane_id = current.airplane_id;
        let held_as = current.status.seat_status();

        availability::ensure_seat_free(self.inventory.as_ref(), airplane_id, new_seat).await?;

        let mut saga = Saga::new("reservation seat change");
        self.inventory
            .free_seat(airplane_id, &current.seat_number)
            .await
            .map_err(|e| e.into_core("free previous seat"))?;
        saga.record(Compensation::RestoreSeat {
            airplane_id,
            seat_number: current.seat_number.clone(),
            status: held_as,
        });

        if let Err(e) = self
            .inventory
            .set_seat_status(airplane_id, new_seat, held_as, Some(SeatStatus::Free))
            .await
        {
            let cause = e.into_core("reserve new seat");
            return Err(saga.unwind(self.inventory.as_ref(), &self.book, cause).await);
        }
        Ok(())
    }

    /// Frees the seat, then drops the reservation and any payment for it.
    /// Nothing is removed if the inventory cannot be reached.
    pub async fn delete_reservation(
        &self,
        reservation_id: u64,
    ) -> CoreResult<(Reservation, Option<Payment>)> {
        let reservation = self
            .book
            .reservation(reservation_id)
            .await
            .ok_or_else(|| reservation_not_found(reservation_id))?;

        self.release_seat(reservation.airplane_id, &reservation.seat_number)
            .await?;

        let removed = self
            .book
            .remove_reservation(reservation_id)
            .await
            .ok_or_else(|| reservation_not_found(reservation_id))?;
        tracing::info!(reservation_id, "Reservation deleted");
        Ok(removed)
    }

    /// Frees a seat, tolerating one that no longer exists in the inventory.
    pub(crate) async fn release_seat(&self, airplane_id: u32, seat_number: &str) -> CoreResult<()> {
        match self.inventory.free_seat(airplane_id, seat_number).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => {
                tracing::warn!(airplane_id, seat = %seat_number, "Seat already gone from inventory");
                Ok(())
            }
            Err(e) => Err(e.into_core("free seat")),
        }
    }

    pub async fn reservations(&self) -> Vec<Reservation> {
        self.book.list_reservations().await
    }

    pub async fn reservation(&self, reservation_id: u64) -> CoreResult<Reservation> {
        self.book
            .reservation(reservation_id)
            .await
            .ok_or_else(|| reservation_not_found(reservation_id))
    }

    pub async fn reservation_by_code(&self, code: &str) -> CoreResult<Reservation> {
        let code = validation::reservation_code(code)?;
        self.book
            .reservation_by_code(&code)
            .await
            .ok_or_else(|| CoreError::NotFound(format!("reservation {} not found", code)))
    }
}
