use aerodesk_inventory::InventoryStore;
use aerodesk_ledger::BookingOrchestrator;
use aerodesk_store::{InventoryClient, LedgerClient};
use std::sync::Arc;
use uuid::Uuid;

/// Identifies one running process in the `X-Instance-Id` header.
#[derive(Debug, Clone)]
pub struct InstanceId(Arc<str>);

impl InstanceId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string().into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone)]
pub struct InventoryState {
    pub store: Arc<InventoryStore>,
    pub instance: InstanceId,
}

#[derive(Clone)]
pub struct LedgerState {
    pub orchestrator: Arc<BookingOrchestrator>,
    pub instance: InstanceId,
}

#[derive(Clone)]
pub struct FacadeState {
    pub inventory: Arc<InventoryClient>,
    pub ledger: Arc<LedgerClient>,
    pub instance: InstanceId,
}
