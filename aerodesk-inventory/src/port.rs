use aerodesk_core::{CoreError, SeatInventory, UpstreamError};
use aerodesk_shared::{Route, Seat, SeatStatus};
use async_trait::async_trait;

use crate::inventory::InventoryStore;
use crate::models::SeatStatusChange;

/// Lets the ledger run against an in-process store.
#[async_trait]
impl SeatInventory for InventoryStore {
    async fn route(&self, airplane_route_id: u32) -> Result<Option<Route>, UpstreamError> {
        match self.get_route(airplane_route_id).await {
            Ok(route) => Ok(Some(route)),
            Err(CoreError::NotFound(_)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn seats(&self, airplane_id: u32) -> Result<Option<Vec<Seat>>, UpstreamError> {
        match self.list_seats(airplane_id).await {
            Ok(seats) => Ok(Some(seats)),
            Err(CoreError::NotFound(_)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn set_seat_status(
        &self,
        airplane_id: u32,
        seat_number: &str,
        status: SeatStatus,
        expected: Option<SeatStatus>,
    ) -> Result<Seat, UpstreamError> {
        let change = SeatStatusChange { status, expected };
        Ok(self
            .update_seat_status(airplane_id, seat_number, change)
            .await?
            .into_inner())
    }

    async fn free_seat(&self, airplane_id: u32, seat_number: &str) -> Result<Seat, UpstreamError> {
        Ok(self.release_seat(airplane_id, seat_number).await?.into_inner())
    }
}
