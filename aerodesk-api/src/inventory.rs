use aerodesk_core::validation::positive_id;
use aerodesk_core::Change;
use aerodesk_inventory::{AirplaneSpec, AirplaneUpdate, FleetSnapshot, RouteSpec, SeatStatusChange};
use aerodesk_shared::{Airplane, Route, Seat};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::error::AppError;
use crate::extract::{ValidJson, ValidPath};
use crate::state::InventoryState;

pub fn routes() -> Router<InventoryState> {
    Router::new()
        .route("/add_airplane", post(add_airplane))
        .route("/get_airplanes", get(list_airplanes))
        .route("/get_airplane_by_id/{id}", get(get_airplane))
        .route("/update_airplane/{id}", put(update_airplane))
        .route("/delete_airplane_by_id/{id}", delete(delete_airplane))
        .route("/get_airplane_seats/{id}/seats", get(list_seats))
        .route("/seats/grouped-by-airplane", get(seats_by_airplane))
        .route("/get_random_free_seat/{id}", get(first_free_seat))
        .route("/update_seat_status/{id}/seats/{seat}", put(update_seat_status))
        .route("/free_seat/{id}/seats/{seat}", put(free_seat))
        .route("/add_airplane_route", post(add_route))
        .route("/get_all_airplanes_routes", get(list_routes))
        .route("/get_airplanes_route_by_id/{id}", get(get_route))
        .route("/update_airplane_route_by_id/{id}", put(update_route))
        .route("/delete_airplane_route_by_id/{id}", delete(delete_route))
        .route("/health", get(health))
        .route("/__state", get(fleet_state))
}

// ============================================================================
// Airplanes
// ============================================================================

async fn add_airplane(
    State(state): State<InventoryState>,
    ValidJson(spec): ValidJson<AirplaneSpec>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let airplane = state.store.add_airplane(spec).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "airplane created", "airplane": airplane })),
    ))
}

async fn list_airplanes(State(state): State<InventoryState>) -> Json<Vec<Airplane>> {
    Json(state.store.list_airplanes().await)
}

async fn get_airplane(
    State(state): State<InventoryState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<Airplane>, AppError> {
    let airplane_id = positive_id("airplane_id", id)?;
    Ok(Json(state.store.get_airplane(airplane_id).await?))
}

async fn update_airplane(
    State(state): State<InventoryState>,
    ValidPath(id): ValidPath<i64>,
    ValidJson(update): ValidJson<AirplaneUpdate>,
) -> Result<Json<Value>, AppError> {
    let airplane_id = positive_id("airplane_id", id)?;
    let body = match state.store.update_airplane(airplane_id, update).await? {
        Change::Applied(airplane) => json!({ "message": "airplane updated", "airplane": airplane }),
        Change::Unchanged(airplane) => json!({ "message": "no changes", "airplane": airplane }),
    };
    Ok(Json(body))
}

async fn delete_airplane(
    State(state): State<InventoryState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<Value>, AppError> {
    let airplane_id = positive_id("airplane_id", id)?;
    let removed_seats = state.store.delete_airplane(airplane_id).await?;
    Ok(Json(json!({
        "message": format!("airplane {} deleted", airplane_id),
        "removed_seats": removed_seats,
    })))
}

// ============================================================================
// Seats
// ============================================================================

async fn list_seats(
    State(state): State<InventoryState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<Vec<Seat>>, AppError> {
    let airplane_id = positive_id("airplane_id", id)?;
    Ok(Json(state.store.list_seats(airplane_id).await?))
}

async fn seats_by_airplane(State(state): State<InventoryState>) -> Json<BTreeMap<u32, Vec<Seat>>> {
    Json(state.store.seats_by_airplane().await)
}

async fn first_free_seat(
    State(state): State<InventoryState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<Seat>, AppError> {
    let airplane_id = positive_id("airplane_id", id)?;
    Ok(Json(state.store.first_free_seat(airplane_id).await?))
}

async fn update_seat_status(
    State(state): State<InventoryState>,
    ValidPath((id, seat_number)): ValidPath<(i64, String)>,
    ValidJson(change): ValidJson<SeatStatusChange>,
) -> Result<Json<Value>, AppError> {
    let airplane_id = positive_id("airplane_id", id)?;
    let change = state
        .store
        .update_seat_status(airplane_id, &seat_number, change)
        .await?;
    Ok(Json(seat_reply(change)))
}

async fn free_seat(
    State(state): State<InventoryState>,
    ValidPath((id, seat_number)): ValidPath<(i64, String)>,
) -> Result<Json<Value>, AppError> {
    let airplane_id = positive_id("airplane_id", id)?;
    let change = state.store.release_seat(airplane_id, &seat_number).await?;
    Ok(Json(seat_reply(change)))
}

fn seat_reply(change: Change<Seat>) -> Value {
    match change {
        Change::Applied(seat) => json!({
            "message": format!("seat {} is now {}", seat.seat_number, seat.status),
            "seat": seat,
        }),
        Change::Unchanged(seat) => json!({ "message": "no changes", "seat": seat }),
    }
}

// ============================================================================
// Routes
// ============================================================================

async fn add_route(
    State(state): State<InventoryState>,
    ValidJson(spec): ValidJson<RouteSpec>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let route = state.store.add_route(spec).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "route created", "route": route })),
    ))
}

async fn list_routes(State(state): State<InventoryState>) -> Json<Vec<Route>> {
    Json(state.store.list_routes().await)
}

async fn get_route(
    State(state): State<InventoryState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<Route>, AppError> {
    let route_id = positive_id("airplane_route_id", id)?;
    Ok(Json(state.store.get_route(route_id).await?))
}

async fn update_route(
    State(state): State<InventoryState>,
    ValidPath(id): ValidPath<i64>,
    ValidJson(spec): ValidJson<RouteSpec>,
) -> Result<Json<Value>, AppError> {
    let route_id = positive_id("airplane_route_id", id)?;
    let body = match state.store.update_route(route_id, spec).await? {
        Change::Applied(route) => json!({ "message": "route updated", "route": route }),
        Change::Unchanged(route) => json!({ "message": "no changes", "route": route }),
    };
    Ok(Json(body))
}

async fn delete_route(
    State(state): State<InventoryState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<Value>, AppError> {
    let route_id = positive_id("airplane_route_id", id)?;
    let route = state.store.delete_route(route_id).await?;
    Ok(Json(json!({
        "message": format!("route {} deleted", route_id),
        "route": route,
    })))
}

// ============================================================================
// Diagnostics
// ============================================================================

async fn health(State(state): State<InventoryState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "inventory",
        "instance_id": state.instance.as_str(),
    }))
}

async fn fleet_state(State(state): State<InventoryState>) -> Json<FleetSnapshot> {
    Json(state.store.snapshot().await)
}
