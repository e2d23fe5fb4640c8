use aerodesk_core::{CoreError, SeatInventory};
use aerodesk_shared::{ReservationStatus, SeatStatus};

use crate::manager::LedgerBook;

/// Undo step for a mutation a workflow has already applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Compensation {
    /// Put a seat back into the status it had before the workflow touched it.
    RestoreSeat {
        airplane_id: u32,
        seat_number: String,
        status: SeatStatus,
    },
    /// Return a reservation to its pre-payment status and drop the settlement claim.
    AbandonSettlement {
        reservation_id: u64,
        previous: ReservationStatus,
    },
}

/// Compensation log for one multi-step workflow.
///
/// Steps are recorded as remote or local mutations succeed and, if a later
/// step fails, replayed newest first. A compensation that itself fails is
/// logged and skipped, and the caller's error becomes an internal error
/// naming how many undo steps did not apply.
#[derive(Debug)]
pub struct Saga {
    name: &'static str,
    steps: Vec<Compensation>,
}

impl Saga {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            steps: Vec::new(),
        }
    }

    pub fn record(&mut self, step: Compensation) {
        self.steps.push(step);
    }

    /// Replays the log in reverse after `cause` stopped the workflow and
    /// returns the error to report.
    pub async fn unwind(
        self,
        inventory: &dyn SeatInventory,
        book: &LedgerBook,
        cause: CoreError,
    ) -> CoreError {
        let mut failed = 0;
        tracing::warn!(saga = self.name, steps = self.steps.len(), "Compensating");

        for step in self.steps.into_iter().rev() {
            match step {
                Compensation::RestoreSeat {
                    airplane_id,
                    seat_number,
                    status,
                } => {
                    if let Err(e) = inventory
                        .set_seat_status(airplane_id, &seat_number, status, None)
                        .await
                    {
                        failed += 1;
                        tracing::error!(
                            saga = self.name,
                            airplane_id,
                            seat = %seat_number,
                            status = %status,
                            "Failed to restore seat: {}",
                            e
                        );
                    }
                }
                Compensation::AbandonSettlement {
                    reservation_id,
                    previous,
                } => {
                    book.abandon_settlement(reservation_id, previous).await;
                }
            }
        }

        if failed == 0 {
            return cause;
        }
        CoreError::Internal(format!(
            "{} failed: {}; {} undo step(s) could not be applied",
            self.name, cause, failed
        ))
    }
}
