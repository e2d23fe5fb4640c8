use aerodesk_core::{CoreError, CoreResult};
use aerodesk_shared::{Payment, Reservation, ReservationStatus};
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::Mutex;

use crate::identifiers;

#[derive(Debug, Default)]
struct Books {
    reservations: BTreeMap<u64, Reservation>,
    payments: BTreeMap<String, Payment>,
    /// Reservations whose payment is being settled with the inventory.
    settling: BTreeSet<u64>,
    last_reservation_id: u64,
}

impl Books {
    fn code_taken(&self, code: &str) -> bool {
        self.reservations.values().any(|r| r.reservation_code == code)
    }

    fn payment_for(&self, reservation_id: u64) -> Option<&Payment> {
        self.payments.values().find(|p| p.reservation_id == reservation_id)
    }
}

/// In-memory reservation and payment records.
///
/// The lock only ever covers local map access. Workflows in
/// [`crate::BookingOrchestrator`] release it before calling the inventory.
pub struct LedgerBook {
    books: Mutex<Books>,
}

impl LedgerBook {
    pub fn new() -> Self {
        Self {
            books: Mutex::new(Books::default()),
        }
    }

    /// Hands out the next reservation id and a code no current reservation uses.
    /// Ids are never reused, even after deletions.
    pub async fn allocate_identity(&self) -> (u64, String) {
        let mut books = self.books.lock().await;
        books.last_reservation_id += 1;
        let id = books.last_reservation_id;

        let mut rng = rand::thread_rng();
        let mut code = identifiers::reservation_code(&mut rng);
        while books.code_taken(&code) {
            code = identifiers::reservation_code(&mut rng);
        }
        (id, code)
    }

    /// Stores a reservation, re-rolling its code if a concurrent workflow
    /// claimed the same one in the meantime.
    pub async fn insert_reservation(&self, mut reservation: Reservation) -> Reservation {
        let mut books = self.books.lock().await;
        let mut rng = rand::thread_rng();
        while books.code_taken(&reservation.reservation_code) {
            reservation.reservation_code = identifiers::reservation_code(&mut rng);
        }
        books
            .reservations
            .insert(reservation.reservation_id, reservation.clone());
        reservation
    }

    pub async fn list_reservations(&self) -> Vec<Reservation> {
        self.books.lock().await.reservations.values().cloned().collect()
    }

    pub async fn reservation(&self, reservation_id: u64) -> Option<Reservation> {
        self.books.lock().await.reservations.get(&reservation_id).cloned()
    }

    pub async fn reservation_by_code(&self, code: &str) -> Option<Reservation> {
        self.books
            .lock()
            .await
            .reservations
            .values()
            .find(|r| r.reservation_code == code)
            .cloned()
    }

    pub async fn update_reservation<F>(&self, reservation_id: u64, apply: F) -> CoreResult<Reservation>
    where
        F: FnOnce(&mut Reservation),
    {
        let mut books = self.books.lock().await;
        let reservation = books
            .reservations
            .get_mut(&reservation_id)
            .ok_or_else(|| reservation_not_found(reservation_id))?;
        apply(reservation);
        Ok(reservation.clone())
    }

    /// Removes a reservation together with any payment recorded for it.
    pub async fn remove_reservation(&self, reservation_id: u64) -> Option<(Reservation, Option<Payment>)> {
        let mut books = self.books.lock().await;
        let reservation = books.reservations.remove(&reservation_id)?;
        let payment_id = books.payment_for(reservation_id).map(|p| p.payment_id.clone());
        let payment = payment_id.and_then(|id| books.payments.remove(&id));
        Some((reservation, payment))
    }

    /// Marks a reservation Paid and reserves the right to record its payment.
    ///
    /// Returns the reservation as it was before, so a failed settlement can be
    /// rolled back with [`LedgerBook::abandon_settlement`].
    pub async fn begin_settlement(&self, reservation_id: u64) -> CoreResult<Reservation> {
        let mut books = self.books.lock().await;
        if books.payment_for(reservation_id).is_some() || books.settling.contains(&reservation_id) {
            return Err(CoreError::Conflict(format!(
                "reservation {} already has a payment",
                reservation_id
            )));
        }
        let reservation = books
            .reservations
            .get_mut(&reservation_id)
            .ok_or_else(|| reservation_not_found(reservation_id))?;
        let before = reservation.clone();
        reservation.status = ReservationStatus::Paid;
        books.settling.insert(reservation_id);
        Ok(before)
    }

    /// Records the payment for a settlement started with `begin_settlement`,
    /// assigning it an unused payment id.
    pub async fn complete_settlement(&self, mut payment: Payment) -> Payment {
        let mut books = self.books.lock().await;
        let mut rng = rand::thread_rng();
        while payment.payment_id.is_empty() || books.payments.contains_key(&payment.payment_id) {
            payment.payment_id = identifiers::payment_id(&mut rng);
        }
        books.settling.remove(&payment.reservation_id);
        books.payments.insert(payment.payment_id.clone(), payment.clone());
        payment
    }

    pub async fn abandon_settlement(&self, reservation_id: u64, previous: ReservationStatus) {
        let mut books = self.books.lock().await;
        books.settling.remove(&reservation_id);
        if let Some(reservation) = books.reservations.get_mut(&reservation_id) {
            reservation.status = previous;
        }
    }

    pub async fn list_payments(&self) -> Vec<Payment> {
        self.books.lock().await.payments.values().cloned().collect()
    }

    pub async fn payment(&self, payment_id: &str) -> Option<Payment> {
        self.books.lock().await.payments.get(payment_id).cloned()
    }

    pub async fn update_payment<F>(&self, payment_id: &str, apply: F) -> CoreResult<Payment>
    where
        F: FnOnce(&mut Payment),
    {
        let mut books = self.books.lock().await;
        let payment = books
            .payments
            .get_mut(payment_id)
            .ok_or_else(|| payment_not_found(payment_id))?;
        apply(payment);
        Ok(payment.clone())
    }

    pub async fn remove_payment(&self, payment_id: &str) -> Option<Payment> {
        self.books.lock().await.payments.remove(payment_id)
    }
}

impl Default for LedgerBook {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn reservation_not_found(reservation_id: u64) -> CoreError {
    CoreError::NotFound(format!("reservation {} not found", reservation_id))
}

pub(crate) fn payment_not_found(payment_id: &str) -> CoreError {
    CoreError::NotFound(format!("payment {} not found", payment_id))
}
