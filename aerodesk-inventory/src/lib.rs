//! Airplanes, seats and routes held in memory behind a single store lock.

pub mod inventory;
pub mod models;
pub mod port;
pub mod routes;

pub use inventory::{FleetSnapshot, InventoryStore};
pub use models::{AirplaneSpec, AirplaneUpdate, RouteSpec, SeatStatusChange};
