use axum::{http::Method, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod extract;
pub mod facade;
pub mod inventory;
pub mod ledger;
pub mod middleware;
pub mod state;
pub mod telemetry;

pub use error::AppError;
pub use state::{FacadeState, InstanceId, InventoryState, LedgerState};

pub fn inventory_app(state: InventoryState) -> Router {
    let instance = state.instance.clone();
    finish(inventory::routes().with_state(state), instance)
}

pub fn ledger_app(state: LedgerState) -> Router {
    let instance = state.instance.clone();
    finish(ledger::routes().with_state(state), instance)
}

pub fn facade_app(state: FacadeState) -> Router {
    let instance = state.instance.clone();
    finish(facade::routes().with_state(state), instance)
}

/// Layers shared by all three services.
fn finish(router: Router, instance: InstanceId) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    router
        .fallback(middleware::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn_with_state(instance, middleware::stamp_instance))
}
