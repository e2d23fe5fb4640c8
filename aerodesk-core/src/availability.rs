//! Read-only checks against the seat inventory that run before any seat is
//! written. Both the ledger and the façade use them, so a request is turned
//! away with the same status wherever it is checked first.

use aerodesk_shared::{Route, SeatStatus};

use crate::{CoreError, CoreResult, SeatInventory};

/// Fetches the route and checks it is flown by `airplane_id`. Both failures
/// are field errors (400).
pub async fn route_for_airplane(
    inventory: &dyn SeatInventory,
    airplane_route_id: u32,
    airplane_id: u32,
) -> CoreResult<Route> {
    let route = inventory
        .route(airplane_route_id)
        .await
        .map_err(|e| e.into_core("look up route"))?
        .ok_or_else(|| {
            CoreError::invalid(
                "airplane_route_id",
                format!("route {} does not exist", airplane_route_id),
            )
        })?;
    if route.airplane_id != airplane_id {
        return Err(CoreError::invalid(
            "airplane_id",
            format!(
                "route {} is flown by airplane {}, not {}",
                route.airplane_route_id, route.airplane_id, airplane_id
            ),
        ));
    }
    Ok(route)
}

/// Fails with 400 when the seat does not exist and 409 when it is taken.
pub async fn ensure_seat_free(
    inventory: &dyn SeatInventory,
    airplane_id: u32,
    seat_number: &str,
) -> CoreResult<()> {
    let seats = inventory
        .seats(airplane_id)
        .await
        .map_err(|e| e.into_core("list seats"))?
        .ok_or_else(|| {
            CoreError::invalid("airplane_id", format!("airplane {} has no seats", airplane_id))
        })?;
    let seat = seats
        .iter()
        .find(|s| s.seat_number == seat_number)
        .ok_or_else(|| {
            CoreError::invalid(
                "seat_number",
                format!("seat {} does not exist on airplane {}", seat_number, airplane_id),
            )
        })?;
    if seat.status != SeatStatus::Free {
        return Err(CoreError::Conflict(format!(
            "seat {} on airplane {} is {}",
            seat_number, airplane_id, seat.status
        )));
    }
    Ok(())
}
