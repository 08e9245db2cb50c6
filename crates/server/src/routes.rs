//! Route configuration.

use crate::handlers;
use crate::state::AppState;
use axum::routing::{delete, get};
use axum::Router;
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Liveness probe (intentionally unauthenticated for load balancers)
        .route("/v1/health", get(handlers::health_check))
        // Deletion surface
        .route(
            "/v1/items/{collection}/{signature}",
            delete(handlers::delete_item_tree),
        )
        .route(
            "/v1/items/{collection}/{signature}/caches",
            delete(handlers::sweep_item_caches),
        )
        .route(
            "/v1/items/{collection}/{signature}/caches/{action}",
            delete(handlers::delete_cache_entry),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
