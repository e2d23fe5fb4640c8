//! Configuration and outbound HTTP plumbing shared by the three services.

pub mod app_config;
pub mod breaker;
pub mod http;
pub mod inventory_client;
pub mod ledger_client;

pub use app_config::Config;
pub use breaker::{CircuitBreaker, CircuitState};
pub use http::{Reply, UpstreamHttp};
pub use inventory_client::InventoryClient;
pub use ledger_client::LedgerClient;
