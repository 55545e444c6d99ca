//! Response DTOs.

use serde::{Deserialize, Serialize};

use teslo_realtime::metrics::MetricsSnapshot;
use teslo_realtime::session::ActiveSession;

/// Liveness probe response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the process answers.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Detailed health with realtime gateway state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// Always `"ok"` when the process answers.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since startup.
    pub uptime_seconds: u64,
    /// Attached WebSocket connections.
    pub ws_connections: usize,
    /// Registered sessions.
    pub sessions: usize,
    /// Gateway counters.
    pub metrics: MetricsSnapshot,
}

/// Current presence snapshot, same shape as `clients-updated`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceResponse {
    /// Active sessions in registration order.
    pub clients: Vec<ActiveSession>,
}
