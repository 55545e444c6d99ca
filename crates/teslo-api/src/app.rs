//! Application builder: wires collaborators, router, and middleware.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use teslo_auth::identity::UserDirectory;
use teslo_auth::jwt::JwtDecoder;
use teslo_core::config::AppConfig;
use teslo_core::error::AppError;
use teslo_realtime::server::RealtimeEngine;

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds application state: token verifier, identity store, realtime engine.
pub fn build_state(config: AppConfig) -> AppState {
    let verifier = Arc::new(JwtDecoder::new(&config.auth));
    let identities = Arc::new(UserDirectory::from_config(&config.identity));
    let realtime = Arc::new(RealtimeEngine::new(&config.realtime, verifier, identities));

    AppState {
        config: Arc::new(config),
        realtime,
        started_at: Instant::now(),
    }
}

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    build_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Serves on an already bound listener until `shutdown` resolves, then
/// tears the realtime engine down.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let realtime = state.realtime.clone();
    let app = build_app(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            realtime.shutdown().await;
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))
}

/// Binds the configured address and serves until Ctrl+C.
pub async fn run_server(state: AppState) -> Result<(), AppError> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Teslo server listening on {}", addr);

    serve(listener, state, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
