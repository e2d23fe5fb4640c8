use aerodesk_api::{ledger_app, telemetry, InstanceId, LedgerState};
use aerodesk_ledger::{BookingOrchestrator, LedgerBook};
use aerodesk_store::{Config, InventoryClient};
use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init("aerodesk_api=debug,aerodesk_ledger=debug,aerodesk_store=debug,tower_http=debug,axum::rejection=trace");

    let config = Config::load().context("Failed to load config")?;
    let inventory = InventoryClient::from_config(&config).context("Failed to build inventory client")?;
    tracing::info!(url = %config.services.inventory.url, "Inventory upstream");

    let state = LedgerState {
        orchestrator: Arc::new(BookingOrchestrator::new(
            Arc::new(LedgerBook::new()),
            Arc::new(inventory),
        )),
        instance: InstanceId::generate(),
    };
    tracing::info!(instance = state.instance.as_str(), "Starting ledger service");

    let addr = SocketAddr::from(([0, 0, 0, 0], config.services.ledger.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, ledger_app(state)).await?;
    Ok(())
}
