//! Route handlers.

pub mod ai;
pub mod health;
pub mod models;
pub mod version;

use axum::http::header::{HeaderValue, CACHE_CONTROL};
use axum::routing::{get, post};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the router with all routes.
///
/// Auxiliary routes carry `Cache-Control: no-store` on every response,
/// errors included.
pub fn router(state: AppState) -> Router {
    let auxiliary = Router::new()
        .route("/api/health", get(health::health))
        .route("/api/models", get(models::list_models))
        .route("/api/version", get(version::version))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    Router::new()
        .route("/api/ai", post(ai::run_task))
        .merge(auxiliary)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
