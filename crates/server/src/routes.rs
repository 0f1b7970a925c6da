//! Route configuration.

use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/health", get(handlers::health_check))
        .route("/v1/integrity/furniture", get(handlers::check_integrity))
        .route(
            "/v1/integrity/furniture/{identifier}",
            get(handlers::check_item),
        )
        .route("/v1/sync/furniture", post(handlers::sync_furniture))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
