//! Top-level realtime engine that owns every gateway subsystem.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use teslo_core::config::RealtimeConfig;
use teslo_core::traits::{IdentityResolver, TokenVerifier};

use crate::connection::{ConnectionHandle, ConnectionPool};
use crate::gateway::MessagesGateway;
use crate::metrics::RealtimeMetrics;
use crate::session::SessionRegistry;

/// Realtime engine with explicit startup and teardown.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Session registry.
    pub registry: Arc<SessionRegistry>,
    /// Reachable connections.
    pub pool: Arc<ConnectionPool>,
    /// Connection lifecycle and relay.
    pub gateway: Arc<MessagesGateway>,
    /// Metrics collector.
    pub metrics: Arc<RealtimeMetrics>,
    /// Configuration.
    config: RealtimeConfig,
    /// Parent of every connection's close token.
    shutdown: CancellationToken,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine").finish()
    }
}

impl RealtimeEngine {
    /// Creates the engine and all its subsystems.
    pub fn new(
        config: &RealtimeConfig,
        verifier: Arc<dyn TokenVerifier>,
        identities: Arc<dyn IdentityResolver>,
    ) -> Self {
        let registry = Arc::new(SessionRegistry::new(identities));
        let pool = Arc::new(ConnectionPool::new());
        let metrics = Arc::new(RealtimeMetrics::new());
        let gateway = Arc::new(MessagesGateway::new(
            config,
            verifier,
            registry.clone(),
            pool.clone(),
            metrics.clone(),
        ));

        info!(
            token_header = %config.token_header,
            evict_previous_sessions = config.evict_previous_sessions,
            "Realtime engine initialized"
        );

        Self {
            registry,
            pool,
            gateway,
            metrics,
            config: config.clone(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Engine configuration.
    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }

    /// Creates a handle for a newly accepted socket.
    pub fn open_connection(&self) -> (Arc<ConnectionHandle>, mpsc::Receiver<String>) {
        ConnectionHandle::open(self.config.channel_buffer_size, &self.shutdown)
    }

    /// Closes every connection, including ones still handshaking, and
    /// clears the registry.
    pub async fn shutdown(&self) {
        info!("Shutting down realtime engine");

        self.shutdown.cancel();
        let connections = self.pool.close_all();
        let sessions = self.registry.clear().await;

        info!(connections, sessions, "Realtime engine shut down");
    }
}
