use aerodesk_core::UpstreamError;
use reqwest::Method;
use serde_json::Value;

use crate::app_config::Config;
use crate::breaker::CircuitState;
use crate::http::{Reply, UpstreamHttp};

/// HTTP client for the ledger service. Replies come back raw so callers can
/// relay the ledger's status and body as they are.
pub struct LedgerClient {
    http: UpstreamHttp,
}

impl LedgerClient {
    pub fn new(http: UpstreamHttp) -> Self {
        Self { http }
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let http = UpstreamHttp::new(
            "ledger",
            &config.services.ledger.url,
            &config.upstream,
            &config.resiliency,
        )?;
        Ok(Self::new(http))
    }

    pub async fn breaker_state(&self) -> CircuitState {
        self.http.breaker().state().await
    }

    pub async fn reservations(&self) -> Result<Reply, UpstreamError> {
        self.http.get("/get_all_reservations").await
    }

    pub async fn reservation_by_code(&self, code: &str) -> Result<Reply, UpstreamError> {
        self.http.get(&format!("/get_reservation_by_code/{}", code)).await
    }

    pub async fn reservation_by_id(&self, reservation_id: u64) -> Result<Reply, UpstreamError> {
        self.http
            .get(&format!("/get_reservation_by_id/{}", reservation_id))
            .await
    }

    pub async fn add_reservation(&self, body: Value) -> Result<Reply, UpstreamError> {
        self.http
            .send(Method::POST, "/add_reservation", Some(body))
            .await
    }

    pub async fn update_reservation(&self, code: &str, body: Value) -> Result<Reply, UpstreamError> {
        self.http
            .send(Method::PUT, &format!("/reservations/{}", code), Some(body))
            .await
    }

    pub async fn delete_reservation(&self, reservation_id: u64) -> Result<Reply, UpstreamError> {
        self.http
            .send(
                Method::DELETE,
                &format!("/delete_reservation_by_id/{}", reservation_id),
                None,
            )
            .await
    }

    pub async fn payments(&self) -> Result<Reply, UpstreamError> {
        self.http.get("/get_all_payments").await
    }

    pub async fn payment(&self, payment_id: &str) -> Result<Reply, UpstreamError> {
        self.http
            .get(&format!("/get_payment_by_id/{}", payment_id))
            .await
    }

    pub async fn create_payment(&self, body: Value) -> Result<Reply, UpstreamError> {
        self.http
            .send(Method::POST, "/create_payment", Some(body))
            .await
    }

    pub async fn cancel_payment(&self, payment_id: &str) -> Result<Reply, UpstreamError> {
        self.http
            .send(
                Method::DELETE,
                &format!("/cancel_payment_and_reservation/{}", payment_id),
                None,
            )
            .await
    }

    pub async fn edit_payment(&self, payment_id: &str, body: Value) -> Result<Reply, UpstreamError> {
        self.http
            .send(Method::PUT, &format!("/edit_payment/{}", payment_id), Some(body))
            .await
    }
}
