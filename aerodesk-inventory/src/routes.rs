use aerodesk_core::{Change, CoreError, CoreResult};
use aerodesk_shared::Route;

use crate::inventory::InventoryStore;
use crate::models::RouteSpec;

impl InventoryStore {
    pub async fn add_route(&self, spec: RouteSpec) -> CoreResult<Route> {
        let route = spec.validate()?;
        let mut fleet = self.fleet.write().await;

        if !fleet.airplanes.contains_key(&route.airplane_id) {
            return Err(CoreError::invalid(
                "airplane_id",
                format!("airplane {} does not exist", route.airplane_id),
            ));
        }
        if fleet.routes.values().any(|r| *r == route) {
            return Err(CoreError::invalid("route", "an identical route already exists"));
        }
        if fleet.routes.contains_key(&route.airplane_route_id) {
            return Err(CoreError::invalid(
                "airplane_route_id",
                format!("route {} already exists", route.airplane_route_id),
            ));
        }
        if let Some(clash) = fleet
            .routes
            .values()
            .find(|r| r.flight_number == route.flight_number && r.airplane_id == route.airplane_id)
        {
            return Err(CoreError::invalid(
                "flight_number",
                format!(
                    "flight {} is already assigned to airplane {} by route {}",
                    route.flight_number, route.airplane_id, clash.airplane_route_id
                ),
            ));
        }

        fleet.routes.insert(route.airplane_route_id, route.clone());
        tracing::info!(
            route_id = route.airplane_route_id,
            flight = %route.flight_number,
            airplane_id = route.airplane_id,
            "Route added"
        );
        Ok(route)
    }

    pub async fn list_routes(&self) -> Vec<Route> {
        self.fleet.read().await.routes.values().cloned().collect()
    }

    pub async fn get_route(&self, route_id: u32) -> CoreResult<Route> {
        self.fleet
            .read()
            .await
            .routes
            .get(&route_id)
            .cloned()
            .ok_or_else(|| route_not_found(route_id))
    }

    /// Replaces a route wholesale. The id in the body must match `route_id`.
    pub async fn update_route(&self, route_id: u32, spec: RouteSpec) -> CoreResult<Change<Route>> {
        let route = spec.validate()?;
        if route.airplane_route_id != route_id {
            return Err(CoreError::invalid(
                "airplane_route_id",
                "airplane_route_id cannot be changed",
            ));
        }

        let mut fleet = self.fleet.write().await;
        let current = fleet
            .routes
            .get(&route_id)
            .ok_or_else(|| route_not_found(route_id))?;
        if *current == route {
            return Ok(Change::Unchanged(route));
        }
        if !fleet.airplanes.contains_key(&route.airplane_id) {
            return Err(CoreError::invalid(
                "airplane_id",
                format!("airplane {} does not exist", route.airplane_id),
            ));
        }
        if fleet.routes.values().any(|r| {
            r.airplane_route_id != route_id
                && r.flight_number == route.flight_number
                && r.airplane_id == route.airplane_id
        }) {
            return Err(CoreError::invalid(
                "flight_number",
                format!(
                    "flight {} is already assigned to airplane {}",
                    route.flight_number, route.airplane_id
                ),
            ));
        }

        fleet.routes.insert(route_id, route.clone());
        tracing::info!(route_id, "Route updated");
        Ok(Change::Applied(route))
    }

    pub async fn delete_route(&self, route_id: u32) -> CoreResult<Route> {
        let removed = self
            .fleet
            .write()
            .await
            .routes
            .remove(&route_id)
            .ok_or_else(|| route_not_found(route_id))?;
        tracing::info!(route_id, "Route deleted");
        Ok(removed)
    }
}

fn route_not_found(route_id: u32) -> CoreError {
    CoreError::NotFound(format!("route {} not found", route_id))
}
