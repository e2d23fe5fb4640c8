use aerodesk_api::{ledger_app, InstanceId, LedgerState};
use aerodesk_inventory::{AirplaneSpec, InventoryStore, RouteSpec};
use aerodesk_ledger::{BookingOrchestrator, LedgerBook};
use aerodesk_shared::{Currency, SeatStatus};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Ledger router wired to an in-process store holding airplane 1 (1A, 1B)
/// and route 1.
async fn app() -> (Router, Arc<InventoryStore>) {
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
            departure_time: "2025-05-10 07:00:00".into(),
            arrival: "Bogotá".into(),
            arrival_time: "2025-05-10 09:40:00".into(),
            price: 300,
            currency: Currency::USD,
            airplane_id: 1,
            flight_time: None,
        })
        .await
        .unwrap();

    let app = ledger_app(LedgerState {
        orchestrator: Arc::new(BookingOrchestrator::new(
            Arc::new(LedgerBook::new()),
            store.clone(),
        )),
        instance: InstanceId::generate(),
    });
    (app, store)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn booking(seat: &str) -> Value {
    json!({
        "passport_number": "C0482913",
        "full_name": "Ana Mora",
        "email": "ana@example.com",
        "phone_number": "+506 8888 0000",
        "emergency_contact_name": "Luis Mora",
        "emergency_contact_phone": "+506 8888 1111",
        "airplane_id": 1,
        "airplane_route_id": 1,
        "seat_number": seat,
        "status": "Reservado",
    })
}

#[tokio::test]
async fn test_reservation_validation() {
    let (app, _) = app().await;

    let mut bad = booking("1A");
    bad["email"] = json!("not-an-email");
    bad["airplane_id"] = json!(0);
    let (status, body) = call(&app, Method::POST, "/add_reservation", Some(bad)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["email"].is_array());
    assert!(body["errors"]["airplane_id"].is_array());

    let mut paid = booking("1A");
    paid["status"] = json!("Paid");
    let (status, _) = call(&app, Method::POST, "/add_reservation", Some(paid)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, Method::POST, "/add_reservation", Some(booking("7C"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, Method::GET, "/get_reservation_by_code/AB", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = call(&app, Method::GET, "/get_reservation_by_code/ABC123", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&app, Method::GET, "/get_reservation_by_id/-1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reservation_passport_is_returned() {
    let (app, store) = app().await;

    let (status, body) = call(&app, Method::POST, "/add_reservation", Some(booking("1b"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["reservation"]["passport_number"], "C0482913");
    assert_eq!(body["reservation"]["seat_number"], "1B");
    assert_eq!(store.get_seat(1, "1B").await.unwrap().status, SeatStatus::Reserved);

    let code = body["reservation"]["reservation_code"].as_str().unwrap().to_string();
    let (status, body) = call(&app, Method::GET, &format!("/get_reservation_by_code/{}", code), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reservation_id"], 1);
}

#[tokio::test]
async fn test_payment_edits_and_deletes() {
    let (app, store) = app().await;
    call(&app, Method::POST, "/add_reservation", Some(booking("1A"))).await;

    let (status, _) = call(
        &app,
        Method::POST,
        "/create_payment",
        Some(json!({"reservation_id": 1, "payment_method": "Cash"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &app,
        Method::POST,
        "/create_payment",
        Some(json!({"reservation_id": 2, "payment_method": "Card"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(
        &app,
        Method::POST,
        "/create_payment",
        Some(json!({"reservation_id": 1, "payment_method": "Tarjeta", "currency": "CRC"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["payment"]["amount"], 300);
    let payment_id = body["payment"]["payment_id"].as_str().unwrap().to_string();

    let (status, body) = call(
        &app,
        Method::PUT,
        &format!("/edit_payment/{}", payment_id),
        Some(json!({"payment_method": "SINPE", "payment_date": "Junio 01, 2025 - 10:00:00"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payment"]["payment_method"], "SINPE");
    assert_eq!(body["payment"]["payment_date"], "June 01, 2025 - 10:00:00");

    let (status, _) = call(
        &app,
        Method::PUT,
        &format!("/edit_payment/{}", payment_id),
        Some(json!({"amount": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, Method::PUT, "/edit_payment/PAY12", Some(json!({"transaction_reference": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Record-only delete leaves the seat and reservation as they were
    let (status, _) = call(&app, Method::DELETE, &format!("/delete_payment_by_id/{}", payment_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.get_seat(1, "1A").await.unwrap().status, SeatStatus::Paid);
    let (status, _) = call(&app, Method::GET, "/get_reservation_by_id/1", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(&app, Method::DELETE, "/delete_reservation_by_id/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted_reservation"]["reservation_id"], 1);
    assert_eq!(store.get_seat(1, "1A").await.unwrap().status, SeatStatus::Free);

    let (status, body) = call(&app, Method::GET, "/get_all_payments", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}
