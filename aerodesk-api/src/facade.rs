//! Consumer-facing routes. Owns no state: reads are relayed from the
//! inventory or the ledger, and writes are pre-checked against the inventory
//! before the ledger performs them.

use aerodesk_core::validation::{self, positive_id};
use aerodesk_core::{availability, SeatInventory};
use aerodesk_ledger::{NewPayment, NewReservation, PaymentEdit, ReservationEdit};
use aerodesk_shared::{Airplane, Reservation, Seat};
use aerodesk_store::Reply;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::extract::{ValidJson, ValidPath};
use crate::state::FacadeState;

pub fn routes() -> Router<FacadeState> {
    Router::new()
        .route("/get_seats_by_airplane_id/{id}/seats", get(seats_by_airplane_id))
        .route("/get_all_airplanes_with_seats", get(airplanes_with_seats))
        .route("/get_all_airplanes_routes", get(all_routes))
        .route("/get_airplane_route_by_id/{id}", get(route_by_id))
        .route("/get_reservation_by_code/{code}", get(reservation_by_code))
        .route("/get_reservation_by_id/{id}", get(reservation_by_id))
        .route("/get_all_reservations", get(all_reservations))
        .route("/usuario/add_reservation", post(add_reservation))
        .route("/update_reservation/{code}", put(update_reservation))
        .route("/usuario/delete_reservation_by_id/{id}", delete(delete_reservation))
        .route("/usuario/create_payment", post(create_payment))
        .route("/usuario/edit_payment/{payment_id}", put(edit_payment))
        .route("/cancel_payment_and_reservation/{payment_id}", delete(cancel_payment))
        .route("/get_all_payments", get(all_payments))
        .route("/get_payment_by_id/{payment_id}", get(payment_by_id))
        .route("/health", get(health))
}

/// Passes an upstream answer through with its status and body.
fn relay(reply: Reply) -> Response {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
    (status, Json(reply.body)).into_response()
}

fn encode<T: Serialize>(body: &T) -> Result<Value, AppError> {
    serde_json::to_value(body).map_err(|e| AppError::Anyhow(e.into()))
}

// ============================================================================
// Inventory reads
// ============================================================================

#[derive(Debug, Serialize)]
struct AirplaneWithSeats {
    #[serde(flatten)]
    airplane: Airplane,
    seats: Vec<Seat>,
}

async fn seats_by_airplane_id(
    State(state): State<FacadeState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Response, AppError> {
    let airplane_id = positive_id("airplane_id", id)?;
    Ok(relay(state.inventory.seats_reply(airplane_id).await?))
}

async fn airplanes_with_seats(
    State(state): State<FacadeState>,
) -> Result<Json<Vec<AirplaneWithSeats>>, AppError> {
    let airplanes = state.inventory.airplanes().await?;
    let mut seats = state.inventory.seats_by_airplane().await?;

    let combined = airplanes
        .into_iter()
        .map(|airplane| AirplaneWithSeats {
            seats: seats.remove(&airplane.airplane_id).unwrap_or_default(),
            airplane,
        })
        .collect();
    Ok(Json(combined))
}

async fn all_routes(State(state): State<FacadeState>) -> Result<Response, AppError> {
    let routes = state.inventory.routes().await?;
    if routes.is_empty() {
        return Err(AppError::NotFoundError("no routes found".into()));
    }
    Ok(Json(routes).into_response())
}

async fn route_by_id(
    State(state): State<FacadeState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Response, AppError> {
    let route_id = positive_id("airplane_route_id", id)?;
    Ok(relay(state.inventory.route_reply(route_id).await?))
}

// ============================================================================
// Reservations
// ============================================================================

async fn reservation_by_code(
    State(state): State<FacadeState>,
    ValidPath(code): ValidPath<String>,
) -> Result<Response, AppError> {
    let code = validation::reservation_code(&code)?;
    Ok(relay(state.ledger.reservation_by_code(&code).await?))
}

async fn reservation_by_id(
    State(state): State<FacadeState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Response, AppError> {
    let reservation_id = positive_id("reservation_id", id)?;
    Ok(relay(state.ledger.reservation_by_id(reservation_id.into()).await?))
}

async fn all_reservations(State(state): State<FacadeState>) -> Result<Response, AppError> {
    Ok(relay(state.ledger.reservations().await?))
}

async fn add_reservation(
    State(state): State<FacadeState>,
    ValidJson(request): ValidJson<NewReservation>,
) -> Result<Response, AppError> {
    let target = request.validate()?;
    let inventory: &dyn SeatInventory = &*state.inventory;

    // 1. Route and seat must check out before the ledger is asked
    availability::route_for_airplane(inventory, target.airplane_route_id, target.airplane_id)
        .await?;
    availability::ensure_seat_free(inventory, target.airplane_id, &target.seat_number).await?;

    // 2. The ledger validates again and performs the seat write
    let mut body = encode(&request)?;
    body["seat_number"] = json!(target.seat_number);
    Ok(relay(state.ledger.add_reservation(body).await?))
}

async fn update_reservation(
    State(state): State<FacadeState>,
    ValidPath(code): ValidPath<String>,
    ValidJson(edit): ValidJson<ReservationEdit>,
) -> Result<Response, AppError> {
    let code = validation::reservation_code(&code)?;
    let edit = edit.validate()?;

    // 1. Current record
    let reply = state.ledger.reservation_by_code(&code).await?;
    if !reply.is_success() {
        return Ok(relay(reply));
    }
    let current: Reservation = reply.decode()?;

    // 2. Identical body: nothing to do
    if edit.matches(&current) {
        return Ok(Json(json!({ "message": "no changes", "reservation": current })).into_response());
    }

    // 3. A new seat must exist and be free
    if edit.seat_number != current.seat_number {
        availability::ensure_seat_free(&*state.inventory, current.airplane_id, &edit.seat_number)
            .await?;
    }

    // 4. Delegate
    Ok(relay(state.ledger.update_reservation(&code, encode(&edit)?).await?))
}

async fn delete_reservation(
    State(state): State<FacadeState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Response, AppError> {
    let reservation_id = positive_id("reservation_id", id)?;
    Ok(relay(state.ledger.delete_reservation(reservation_id.into()).await?))
}

// ============================================================================
// Payments
// ============================================================================

async fn create_payment(
    State(state): State<FacadeState>,
    ValidJson(request): ValidJson<NewPayment>,
) -> Result<Response, AppError> {
    let reservation_id = request.validate()?;

    let reply = state.ledger.reservation_by_id(reservation_id).await?;
    if !reply.is_success() {
        return Ok(relay(reply));
    }

    Ok(relay(state.ledger.create_payment(encode(&request)?).await?))
}

async fn edit_payment(
    State(state): State<FacadeState>,
    ValidPath(payment_id): ValidPath<String>,
    ValidJson(edit): ValidJson<PaymentEdit>,
) -> Result<Response, AppError> {
    let payment_id = validation::payment_id(&payment_id)?;
    edit.validate()?;
    Ok(relay(state.ledger.edit_payment(&payment_id, encode(&edit)?).await?))
}

async fn cancel_payment(
    State(state): State<FacadeState>,
    ValidPath(payment_id): ValidPath<String>,
) -> Result<Response, AppError> {
    let payment_id = validation::payment_id(&payment_id)?;
    Ok(relay(state.ledger.cancel_payment(&payment_id).await?))
}

async fn all_payments(State(state): State<FacadeState>) -> Result<Response, AppError> {
    Ok(relay(state.ledger.payments().await?))
}

async fn payment_by_id(
    State(state): State<FacadeState>,
    ValidPath(payment_id): ValidPath<String>,
) -> Result<Response, AppError> {
    let payment_id = validation::payment_id(&payment_id)?;
    Ok(relay(state.ledger.payment(&payment_id).await?))
}

async fn health(State(state): State<FacadeState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "facade",
        "instance_id": state.instance.as_str(),
        "upstreams": {
            "inventory": format!("{:?}", state.inventory.breaker_state().await),
            "ledger": format!("{:?}", state.ledger.breaker_state().await),
        },
    }))
}
