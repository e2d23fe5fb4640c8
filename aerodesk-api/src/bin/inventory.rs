use aerodesk_api::{inventory_app, telemetry, InstanceId, InventoryState};
use aerodesk_inventory::InventoryStore;
use aerodesk_store::Config;
use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init("aerodesk_api=debug,aerodesk_inventory=debug,tower_http=debug,axum::rejection=trace");

    let config = Config::load().context("Failed to load config")?;
    let state = InventoryState {
        store: Arc::new(InventoryStore::new()),
        instance: InstanceId::generate(),
    };
    tracing::info!(instance = state.instance.as_str(), "Starting inventory service");

    let addr = SocketAddr::from(([0, 0, 0, 0], config.services.inventory.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, inventory_app(state)).await?;
    Ok(())
}
