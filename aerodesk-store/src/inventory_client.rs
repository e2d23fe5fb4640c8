use aerodesk_core::{SeatInventory, UpstreamError};
use aerodesk_shared::{Airplane, Route, Seat, SeatStatus};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use std::collections::BTreeMap;

use crate::app_config::Config;
use crate::breaker::CircuitState;
use crate::http::{Reply, UpstreamHttp};

/// HTTP client for the inventory service.
pub struct InventoryClient {
    http: UpstreamHttp,
}

impl InventoryClient {
    pub fn new(http: UpstreamHttp) -> Self {
        Self { http }
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let http = UpstreamHttp::new(
            "inventory",
            &config.services.inventory.url,
            &config.upstream,
            &config.resiliency,
        )?;
        Ok(Self::new(http))
    }

    pub async fn breaker_state(&self) -> CircuitState {
        self.http.breaker().state().await
    }

    /// Raw seat listing, for relaying status and body unchanged.
    pub async fn seats_reply(&self, airplane_id: u32) -> Result<Reply, UpstreamError> {
        self.http
            .get(&format!("/get_airplane_seats/{}/seats", airplane_id))
            .await
    }

    pub async fn route_reply(&self, airplane_route_id: u32) -> Result<Reply, UpstreamError> {
        self.http
            .get(&format!("/get_airplanes_route_by_id/{}", airplane_route_id))
            .await
    }

    pub async fn airplanes(&self) -> Result<Vec<Airplane>, UpstreamError> {
        expect_success(self.http.get("/get_airplanes").await?)?.decode()
    }

    pub async fn seats_by_airplane(&self) -> Result<BTreeMap<u32, Vec<Seat>>, UpstreamError> {
        expect_success(self.http.get("/seats/grouped-by-airplane").await?)?.decode()
    }

    pub async fn routes(&self) -> Result<Vec<Route>, UpstreamError> {
        expect_success(self.http.get("/get_all_airplanes_routes").await?)?.decode()
    }
}

fn expect_success(reply: Reply) -> Result<Reply, UpstreamError> {
    if reply.is_success() {
        Ok(reply)
    } else {
        Err(reply.into_rejection())
    }
}

#[async_trait]
impl SeatInventory for InventoryClient {
    async fn route(&self, airplane_route_id: u32) -> Result<Option<Route>, UpstreamError> {
        let reply = self.route_reply(airplane_route_id).await?;
        match reply.status {
            404 => Ok(None),
            _ => expect_success(reply)?.decode().map(Some),
        }
    }

    async fn seats(&self, airplane_id: u32) -> Result<Option<Vec<Seat>>, UpstreamError> {
        let reply = self.seats_reply(airplane_id).await?;
        match reply.status {
            404 => Ok(None),
            _ => expect_success(reply)?.decode().map(Some),
        }
    }

    async fn set_seat_status(
        &self,
        airplane_id: u32,
        seat_number: &str,
        status: SeatStatus,
        expected: Option<SeatStatus>,
    ) -> Result<Seat, UpstreamError> {
        let mut body = json!({ "status": status });
        if let Some(expected) = expected {
            body["expected"] = json!(expected);
        }
        let reply = self
            .http
            .send(
                Method::PUT,
                &format!("/update_seat_status/{}/seats/{}", airplane_id, seat_number),
                Some(body),
            )
            .await?;
        expect_success(reply)?.decode_field("seat")
    }

    async fn free_seat(&self, airplane_id: u32, seat_number: &str) -> Result<Seat, UpstreamError> {
        let reply = self
            .http
            .send(
                Method::PUT,
                &format!("/free_seat/{}/seats/{}", airplane_id, seat_number),
                None,
            )
            .await?;
        expect_success(reply)?.decode_field("seat")
    }
}
