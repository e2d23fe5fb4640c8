use aerodesk_api::{facade_app, telemetry, FacadeState, InstanceId};
use aerodesk_store::{Config, InventoryClient, LedgerClient};
use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init("aerodesk_api=debug,aerodesk_store=debug,tower_http=debug,axum::rejection=trace");

    let config = Config::load().context("Failed to load config")?;
    let state = FacadeState {
        inventory: Arc::new(InventoryClient::from_config(&config).context("Failed to build inventory client")?),
        ledger: Arc::new(LedgerClient::from_config(&config).context("Failed to build ledger client")?),
        instance: InstanceId::generate(),
    };
    tracing::info!(
        instance = state.instance.as_str(),
        inventory = %config.services.inventory.url,
        ledger = %config.services.ledger.url,
        "Starting facade service"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.services.facade.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, facade_app(state)).await?;
    Ok(())
}
