use aerodesk_core::{validation, CoreError, CoreResult, SeatInventory};
use aerodesk_shared::{schedule, Payment, PaymentStatus, Reservation, SeatStatus};
use std::sync::Arc;

use crate::identifiers;
use crate::manager::{payment_not_found, LedgerBook};
use crate::models::{NewPayment, PaymentEdit};
use crate::orchestrator::BookingOrchestrator;
use crate::saga::{Compensation, Saga};

impl BookingOrchestrator {
    /// Settles a reservation: marks it Paid, moves its seat to Paid and
    /// records the payment. A failed seat write puts the reservation back to
    /// its previous status and records nothing.
    ///
    /// Once the reservation is claimed the settlement runs on its own task,
    /// so it completes or rolls back even if the caller stops waiting.
    pub async fn create_payment(&self, request: NewPayment) -> CoreResult<Payment> {
        let reservation_id = request.validate()?;
        let before = self.book.begin_settlement(reservation_id).await?;

        let settlement = tokio::spawn(settle(
            self.book.clone(),
            self.inventory.clone(),
            before,
            request,
        ));
        settlement.await.map_err(|e| {
            CoreError::Internal(format!(
                "settlement of reservation {} did not finish: {}",
                reservation_id, e
            ))
        })?
    }

    /// Frees the seat, then removes the payment and its reservation.
    ///
    /// The seat goes first so an interruption leaves a free seat with stale
    /// records rather than a seat nobody can book.
    pub async fn cancel_payment(&self, payment_id: &str) -> CoreResult<(Payment, Option<Reservation>)> {
        let payment_id = validation::payment_id(payment_id)?;
        let payment = self
            .book
            .payment(&payment_id)
            .await
            .ok_or_else(|| payment_not_found(&payment_id))?;

        // The reservation may have changed seats since it was paid for
        let (airplane_id, seat_number) = match self.book.reservation(payment.reservation_id).await {
            Some(reservation) => (reservation.airplane_id, reservation.seat_number),
            None => (payment.airplane_id, payment.seat_number.clone()),
        };
        self.release_seat(airplane_id, &seat_number).await?;

        let removed_payment = self
            .book
            .remove_payment(&payment_id)
            .await
            .ok_or_else(|| payment_not_found(&payment_id))?;
        let removed_reservation = self
            .book
            .remove_reservation(payment.reservation_id)
            .await
            .map(|(reservation, _)| reservation);

        tracing::info!(
            payment_id = %payment_id,
            reservation_id = payment.reservation_id,
            reservation_removed = removed_reservation.is_some(),
            "Payment and reservation cancelled"
        );
        Ok((removed_payment, removed_reservation))
    }

    /// Corrects method, date or transaction reference. No seat side effects.
    pub async fn edit_payment(&self, payment_id: &str, edit: PaymentEdit) -> CoreResult<Payment> {
        let payment_id = validation::payment_id(payment_id)?;
        let correction = edit.validate()?;

        let updated = self
            .book
            .update_payment(&payment_id, |payment| {
                if let Some(method) = correction.payment_method {
                    payment.payment_method = method;
                }
                if let Some(date) = correction.payment_date {
                    payment.payment_date = date;
                }
                if let Some(reference) = &correction.transaction_reference {
                    payment.transaction_reference = reference.clone();
                }
            })
            .await?;
        tracing::info!(payment_id = %payment_id, "Payment updated");
        Ok(updated)
    }

    pub async fn payments(&self) -> Vec<Payment> {
        self.book.list_payments().await
    }

    pub async fn payment(&self, payment_id: &str) -> CoreResult<Payment> {
        let payment_id = validation::payment_id(payment_id)?;
        self.book
            .payment(&payment_id)
            .await
            .ok_or_else(|| payment_not_found(&payment_id))
    }

    /// Drops the payment record only; the seat and reservation are untouched.
    pub async fn delete_payment(&self, payment_id: &str) -> CoreResult<Payment> {
        let payment_id = validation::payment_id(payment_id)?;
        let removed = self
            .book
            .remove_payment(&payment_id)
            .await
            .ok_or_else(|| payment_not_found(&payment_id))?;
        tracing::info!(payment_id = %payment_id, "Payment record deleted");
        Ok(removed)
    }
}

async fn settle(
    book: Arc<LedgerBook>,
    inventory: Arc<dyn SeatInventory>,
    before: Reservation,
    request: NewPayment,
) -> CoreResult<Payment> {
    let reservation_id = before.reservation_id;
    let mut saga = Saga::new("payment creation");
    saga.record(Compensation::AbandonSettlement {
        reservation_id,
        previous: before.status,
    });

    if let Err(e) = inventory
        .set_seat_status(before.airplane_id, &before.seat_number, SeatStatus::Paid, None)
        .await
    {
        let cause = e.into_core("mark seat as paid");
        return Err(saga.unwind(inventory.as_ref(), &book, cause).await);
    }

    let draft = {
        let mut rng = rand::thread_rng();
        payment_from(
            &before,
            &request,
            identifiers::payment_id(&mut rng),
            identifiers::transaction_reference(&mut rng),
        )
    };
    let payment = book.complete_settlement(draft).await;

    tracing::info!(
        payment_id = %payment.payment_id,
        reservation_id,
        amount = payment.amount,
        currency = %payment.currency,
        "Payment recorded"
    );
    Ok(payment)
}

fn payment_from(
    reservation: &Reservation,
    request: &NewPayment,
    payment_id: String,
    transaction_reference: String,
) -> Payment {
    Payment {
        payment_id,
        reservation_id: reservation.reservation_id,
        reservation_code: reservation.reservation_code.clone(),
        passport_number: reservation.passport_number.clone(),
        full_name: reservation.full_name.clone(),
        email: reservation.email.clone(),
        phone_number: reservation.phone_number.clone(),
        emergency_contact_name: reservation.emergency_contact_name.clone(),
        emergency_contact_phone: reservation.emergency_contact_phone.clone(),
        airplane_id: reservation.airplane_id,
        airplane_route_id: reservation.airplane_route_id,
        seat_number: reservation.seat_number.clone(),
        flight_number: reservation.flight_number.clone(),
        amount: reservation.price,
        currency: request.currency,
        payment_method: request.payment_method,
        status: PaymentStatus::Paid,
        payment_date: schedule::now(),
        transaction_reference,
    }
}
