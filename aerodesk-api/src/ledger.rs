use aerodesk_core::validation::positive_id;
use aerodesk_core::Change;
use aerodesk_ledger::{NewPayment, NewReservation, PaymentEdit, ReservationEdit};
use aerodesk_shared::{Payment, Reservation};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::extract::{ValidJson, ValidPath};
use crate::state::LedgerState;

pub fn routes() -> Router<LedgerState> {
    Router::new()
        .route("/add_reservation", post(add_reservation))
        .route("/reservations/{code}", put(update_reservation))
        .route("/delete_reservation_by_id/{id}", delete(delete_reservation))
        .route("/get_all_reservations", get(list_reservations))
        .route("/get_reservation_by_code/{code}", get(reservation_by_code))
        .route("/get_reservation_by_id/{id}", get(reservation_by_id))
        .route("/create_payment", post(create_payment))
        .route("/cancel_payment_and_reservation/{payment_id}", delete(cancel_payment))
        .route("/edit_payment/{payment_id}", put(edit_payment))
        .route("/get_all_payments", get(list_payments))
        .route("/get_payment_by_id/{payment_id}", get(payment_by_id))
        .route("/delete_payment_by_id/{payment_id}", delete(delete_payment))
        .route("/health", get(health))
}

// ============================================================================
// Reservations
// ============================================================================

async fn add_reservation(
    State(state): State<LedgerState>,
    ValidJson(request): ValidJson<NewReservation>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let reservation = state.orchestrator.create_reservation(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "reservation created", "reservation": reservation })),
    ))
}

async fn update_reservation(
    State(state): State<LedgerState>,
    ValidPath(code): ValidPath<String>,
    ValidJson(edit): ValidJson<ReservationEdit>,
) -> Result<Json<Value>, AppError> {
    let body = match state.orchestrator.edit_reservation(&code, edit).await? {
        Change::Applied(reservation) => {
            json!({ "message": "reservation updated", "reservation": reservation })
        }
        Change::Unchanged(reservation) => {
            json!({ "message": "no changes", "reservation": reservation })
        }
    };
    Ok(Json(body))
}

async fn delete_reservation(
    State(state): State<LedgerState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<Value>, AppError> {
    let reservation_id = u64::from(positive_id("reservation_id", id)?);
    let (reservation, payment) = state.orchestrator.delete_reservation(reservation_id).await?;
    Ok(Json(json!({
        "message": format!("reservation {} deleted", reservation_id),
        "deleted_reservation": reservation,
        "deleted_payment": payment,
    })))
}

async fn list_reservations(State(state): State<LedgerState>) -> Json<Vec<Reservation>> {
    Json(state.orchestrator.reservations().await)
}

async fn reservation_by_code(
    State(state): State<LedgerState>,
    ValidPath(code): ValidPath<String>,
) -> Result<Json<Reservation>, AppError> {
    Ok(Json(state.orchestrator.reservation_by_code(&code).await?))
}

async fn reservation_by_id(
    State(state): State<LedgerState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<Reservation>, AppError> {
    let reservation_id = u64::from(positive_id("reservation_id", id)?);
    Ok(Json(state.orchestrator.reservation(reservation_id).await?))
}

// ============================================================================
// Payments
// ============================================================================

async fn create_payment(
    State(state): State<LedgerState>,
    ValidJson(request): ValidJson<NewPayment>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let payment = state.orchestrator.create_payment(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "payment created", "payment": payment })),
    ))
}

async fn cancel_payment(
    State(state): State<LedgerState>,
    ValidPath(payment_id): ValidPath<String>,
) -> Result<Json<Value>, AppError> {
    let (payment, reservation) = state.orchestrator.cancel_payment(&payment_id).await?;
    Ok(Json(json!({
        "message": format!("payment {} and its reservation cancelled", payment.payment_id),
        "deleted_payment": payment,
        "deleted_reservation": reservation,
    })))
}

async fn edit_payment(
    State(state): State<LedgerState>,
    ValidPath(payment_id): ValidPath<String>,
    ValidJson(edit): ValidJson<PaymentEdit>,
) -> Result<Json<Value>, AppError> {
    let payment = state.orchestrator.edit_payment(&payment_id, edit).await?;
    Ok(Json(json!({ "message": "payment updated", "payment": payment })))
}

async fn list_payments(State(state): State<LedgerState>) -> Json<Vec<Payment>> {
    Json(state.orchestrator.payments().await)
}

async fn payment_by_id(
    State(state): State<LedgerState>,
    ValidPath(payment_id): ValidPath<String>,
) -> Result<Json<Payment>, AppError> {
    Ok(Json(state.orchestrator.payment(&payment_id).await?))
}

async fn delete_payment(
    State(state): State<LedgerState>,
    ValidPath(payment_id): ValidPath<String>,
) -> Result<Json<Value>, AppError> {
    let payment = state.orchestrator.delete_payment(&payment_id).await?;
    Ok(Json(json!({
        "message": format!("payment {} deleted", payment.payment_id),
        "deleted_payment": payment,
    })))
}

async fn health(State(state): State<LedgerState>) -> Json<Value> {
    let book = state.orchestrator.book();
    Json(json!({
        "status": "ok",
        "service": "ledger",
        "instance_id": state.instance.as_str(),
        "reservations": book.list_reservations().await.len(),
        "payments": book.list_payments().await.len(),
    }))
}
