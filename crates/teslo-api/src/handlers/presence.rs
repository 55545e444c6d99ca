//! Presence snapshot handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::PresenceResponse;
use crate::state::AppState;

/// GET /api/presence
pub async fn presence(State(state): State<AppState>) -> Json<PresenceResponse> {
    Json(PresenceResponse {
        clients: state.realtime.registry.list_active().await,
    })
}
