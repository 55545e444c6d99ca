//! Route definitions for the Teslo HTTP API.
//!
//! JSON routes are mounted under `/api`; the WebSocket gateway lives at `/ws`.

use axum::{Router, middleware as axum_middleware, routing::get};

use teslo_core::error::AppError;

use crate::error::ApiError;
use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the Axum router with all routes and the request logger.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(presence_routes());

    Router::new()
        .nest("/api", api_routes)
        .route("/ws", get(handlers::ws::ws_upgrade))
        .fallback(not_found)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Health endpoints
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}

/// Presence endpoints
fn presence_routes() -> Router<AppState> {
    Router::new().route("/presence", get(handlers::presence::presence))
}

async fn not_found() -> ApiError {
    AppError::not_found("Route not found").into()
}
