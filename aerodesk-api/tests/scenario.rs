//! All three services on ephemeral ports, talking real HTTP to each other.

use aerodesk_api::{facade_app, inventory_app, ledger_app, FacadeState, InstanceId, InventoryState, LedgerState};
use aerodesk_inventory::InventoryStore;
use aerodesk_ledger::{BookingOrchestrator, LedgerBook};
use aerodesk_store::app_config::{ResiliencyConfig, UpstreamConfig};
use aerodesk_store::{InventoryClient, LedgerClient, UpstreamHttp};
use axum::Router;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;

struct Stack {
    inventory: String,
    ledger: String,
    facade: String,
    http: reqwest::Client,
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn upstream(service: &'static str, url: &str) -> UpstreamHttp {
    let timeouts = UpstreamConfig {
        timeout_seconds: 5,
        connect_timeout_seconds: 1,
    };
    UpstreamHttp::new(service, url, &timeouts, &ResiliencyConfig::default()).unwrap()
}

async fn ledger_against(inventory_url: &str) -> String {
    let inventory = InventoryClient::new(upstream("inventory", inventory_url));
    let app = ledger_app(LedgerState {
        orchestrator: Arc::new(BookingOrchestrator::new(
            Arc::new(LedgerBook::new()),
            Arc::new(inventory),
        )),
        instance: InstanceId::generate(),
    });
    serve(app).await
}

async fn stack() -> Stack {
    let inventory = serve(inventory_app(InventoryState {
        store: Arc::new(InventoryStore::new()),
        instance: InstanceId::generate(),
    }))
    .await;
    let ledger = ledger_against(&inventory).await;
    let facade = serve(facade_app(FacadeState {
        inventory: Arc::new(InventoryClient::new(upstream("inventory", &inventory))),
        ledger: Arc::new(LedgerClient::new(upstream("ledger", &ledger))),
        instance: InstanceId::generate(),
    }))
    .await;

    Stack {
        inventory,
        ledger,
        facade,
        http: reqwest::Client::new(),
    }
}

impl Stack {
    async fn send(&self, method: reqwest::Method, url: String, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await.unwrap();
        let status = response.status();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        (status, body)
    }

    async fn get(&self, url: String) -> (StatusCode, Value) {
        self.send(reqwest::Method::GET, url, None).await
    }

    async fn seat_status(&self, seat_number: &str) -> String {
        let (status, seats) = self
            .get(format!("{}/get_airplane_seats/1/seats", self.inventory))
            .await;
        assert_eq!(status, StatusCode::OK);
        seats
            .as_array()
            .unwrap()
            .iter()
            .find(|s| s["seat_number"] == seat_number)
            .map(|s| s["status"].as_str().unwrap().to_string())
            .unwrap()
    }

    /// Airplane 1 with seats 1A and 1B, flying route 1.
    async fn seed(&self) {
        let (status, _) = self
            .send(
                reqwest::Method::POST,
                format!("{}/add_airplane", self.inventory),
                Some(json!({
                    "airplane_id": 1,
                    "model": "E190",
                    "manufacturer": "Embraer",
                    "year": 2012,
                    "capacity": 2,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = self
            .send(
                reqwest::Method::POST,
                format!("{}/add_airplane_route", self.inventory),
                Some(json!({
                    "airplane_route_id": 1,
                    "flight_number": "AV-0630",
                    "departure": "San José",
                    "departure_time": "Mayo 10, 2025 - 07:00:00",
                    "arrival": "Bogotá",
                    "arrival_time": "Mayo 10, 2025 - 09:40:00",
                    "price": 300,
                    "currency": "USD",
                    "airplane_id": 1,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }
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
        "status": "Reserved",
    })
}

#[tokio::test]
async fn test_reserve_pay_cancel_round_trip() {
    let stack = stack().await;
    stack.seed().await;
    assert_eq!(stack.seat_status("1A").await, "Free");
    assert_eq!(stack.seat_status("1B").await, "Free");

    // Reserve 1A through the ledger
    let (status, body) = stack
        .send(
            reqwest::Method::POST,
            format!("{}/add_reservation", stack.ledger),
            Some(booking("1A")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let reservation = &body["reservation"];
    assert_eq!(reservation["reservation_id"], 1);
    assert_eq!(reservation["price"], 300);
    let code = reservation["reservation_code"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    assert_eq!(stack.seat_status("1A").await, "Reserved");

    // Second claim on the same seat, through either service
    let (status, _) = stack
        .send(
            reqwest::Method::POST,
            format!("{}/add_reservation", stack.ledger),
            Some(booking("1A")),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = stack
        .send(
            reqwest::Method::POST,
            format!("{}/usuario/add_reservation", stack.facade),
            Some(booking("1A")),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Pay
    let (status, body) = stack
        .send(
            reqwest::Method::POST,
            format!("{}/usuario/create_payment", stack.facade),
            Some(json!({"reservation_id": 1, "payment_method": "Card"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let payment_id = body["payment"]["payment_id"].as_str().unwrap().to_string();
    assert!(payment_id.starts_with("PAY"));
    assert_eq!(stack.seat_status("1A").await, "Paid");

    let (status, body) = stack
        .get(format!("{}/get_reservation_by_id/1", stack.facade))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Paid");

    let (status, _) = stack
        .send(
            reqwest::Method::POST,
            format!("{}/usuario/create_payment", stack.facade),
            Some(json!({"reservation_id": 1, "payment_method": "PayPal"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Cancel
    let (status, body) = stack
        .send(
            reqwest::Method::DELETE,
            format!("{}/cancel_payment_and_reservation/{}", stack.facade, payment_id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(stack.seat_status("1A").await, "Free");

    let (status, _) = stack
        .get(format!("{}/get_reservation_by_id/1", stack.facade))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = stack
        .get(format!("{}/get_payment_by_id/{}", stack.facade, payment_id))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_facade_edit_moves_seat() {
    let stack = stack().await;
    stack.seed().await;

    let (status, body) = stack
        .send(
            reqwest::Method::POST,
            format!("{}/usuario/add_reservation", stack.facade),
            Some(booking("1A")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let code = body["reservation"]["reservation_code"].as_str().unwrap().to_lowercase();

    let edit = |seat: &str| {
        json!({
            "seat_number": seat,
            "email": "ana@example.com",
            "phone_number": "+506 8888 0000",
            "emergency_contact_name": "Luis Mora",
            "emergency_contact_phone": "+506 8888 1111",
        })
    };

    let (status, body) = stack
        .send(
            reqwest::Method::PUT,
            format!("{}/update_reservation/{}", stack.facade, code),
            Some(edit("1A")),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "no changes");

    let (status, body) = stack
        .send(
            reqwest::Method::PUT,
            format!("{}/update_reservation/{}", stack.facade, code),
            Some(edit("1B")),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["reservation"]["seat_number"], "1B");
    assert_eq!(stack.seat_status("1A").await, "Free");
    assert_eq!(stack.seat_status("1B").await, "Reserved");

    let mut extra = edit("1A");
    extra["full_name"] = json!("Ana M.");
    let (status, _) = stack
        .send(
            reqwest::Method::PUT,
            format!("{}/update_reservation/{}", stack.facade, code),
            Some(extra),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = stack
        .send(
            reqwest::Method::PUT,
            format!("{}/update_reservation/ZZZZZZ", stack.facade),
            Some(edit("1A")),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = stack
        .send(
            reqwest::Method::DELETE,
            format!("{}/usuario/delete_reservation_by_id/1", stack.facade),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stack.seat_status("1B").await, "Free");
}

#[tokio::test]
async fn test_facade_routes_and_airplanes() {
    let stack = stack().await;

    let (status, _) = stack
        .get(format!("{}/get_all_airplanes_routes", stack.facade))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    stack.seed().await;
    let (status, routes) = stack
        .get(format!("{}/get_all_airplanes_routes", stack.facade))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(routes.as_array().unwrap().len(), 1);

    let (status, airplanes) = stack
        .get(format!("{}/get_all_airplanes_with_seats", stack.facade))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(airplanes[0]["airplane_id"], 1);
    assert_eq!(airplanes[0]["seats"].as_array().unwrap().len(), 2);

    let (status, _) = stack
        .get(format!("{}/get_seats_by_airplane_id/9/seats", stack.facade))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = stack
        .get(format!("{}/get_airplane_route_by_id/0", stack.facade))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unreachable_inventory_is_503() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let ledger = ledger_against(&dead).await;
    let response = reqwest::Client::new()
        .post(format!("{}/add_reservation", ledger))
        .json(&booking("1A"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let response = reqwest::Client::new()
        .get(format!("{}/get_all_reservations", ledger))
        .send()
        .await
        .unwrap();
    let reservations: Value = response.json().await.unwrap();
    assert_eq!(reservations, json!([]));
}
