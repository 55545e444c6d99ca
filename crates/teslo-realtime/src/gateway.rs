//! Messages gateway: connection lifecycle and chat relay.
//!
//! Per connection: `CONNECTING → CONNECTED | REJECTED`, `CONNECTED → CLOSED`.
//! The gateway verifies the handshake token, delegates identity bookkeeping
//! to the [`SessionRegistry`], and fans events out through the
//! [`ConnectionPool`].

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use teslo_core::config::RealtimeConfig;
use teslo_core::traits::TokenVerifier;
use teslo_core::types::id::{ConnectionId, UserId};

use crate::connection::{BroadcastReport, ConnectionHandle, ConnectionPool};
use crate::error::RejectReason;
use crate::message::types::{ChatMessage, InboundEvent, NewMessage, OutboundEvent};
use crate::metrics::RealtimeMetrics;
use crate::session::SessionRegistry;

/// Realtime gateway shared by every socket task.
pub struct MessagesGateway {
    verifier: Arc<dyn TokenVerifier>,
    registry: Arc<SessionRegistry>,
    pool: Arc<ConnectionPool>,
    metrics: Arc<RealtimeMetrics>,
    verify_timeout: Duration,
    evict_previous_sessions: bool,
}

impl std::fmt::Debug for MessagesGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessagesGateway")
            .field("verify_timeout", &self.verify_timeout)
            .field("evict_previous_sessions", &self.evict_previous_sessions)
            .finish()
    }
}

impl MessagesGateway {
    /// Creates a gateway over shared registry, pool, and metrics.
    pub fn new(
        config: &RealtimeConfig,
        verifier: Arc<dyn TokenVerifier>,
        registry: Arc<SessionRegistry>,
        pool: Arc<ConnectionPool>,
        metrics: Arc<RealtimeMetrics>,
    ) -> Self {
        Self {
            verifier,
            registry,
            pool,
            metrics,
            verify_timeout: Duration::from_millis(config.verify_timeout_ms),
            evict_previous_sessions: config.evict_previous_sessions,
        }
    }

    /// Handles a freshly accepted socket.
    ///
    /// On success the connection is attached and every peer, the new one
    /// included, receives a presence snapshot. On failure the handle is
    /// closed, no session remains for it, and nothing is broadcast.
    pub async fn handle_connection(
        &self,
        handle: &Arc<ConnectionHandle>,
        token: Option<&str>,
    ) -> Result<UserId, RejectReason> {
        let user_id = match self.admit(handle, token).await {
            Ok(user_id) => user_id,
            Err(reason) => return Err(self.reject(handle, reason).await),
        };

        if self.evict_previous_sessions {
            self.evict_other_sessions(&user_id, &handle.id).await;
        }

        self.attach_admitted(handle, user_id).await
    }

    /// Makes an admitted connection reachable and announces it.
    ///
    /// A concurrent eviction may drop the session between registration and
    /// attach; such a connection is detached again and rejected. Evictions
    /// that land after the attach find the handle in the pool and close it.
    async fn attach_admitted(
        &self,
        handle: &Arc<ConnectionHandle>,
        user_id: UserId,
    ) -> Result<UserId, RejectReason> {
        self.pool.attach(handle.clone());
        self.metrics.connection_opened();

        if self.registry.get(&handle.id).await.is_none() {
            if self.pool.detach(&handle.id).is_some() {
                self.metrics.connection_closed();
            }
            return Err(self.reject(handle, RejectReason::Evicted).await);
        }

        info!(conn_id = %handle.id, user_id = %user_id, "Client connected");

        self.broadcast_presence().await;
        Ok(user_id)
    }

    /// Undoes a failed handshake: no session, closed handle.
    async fn reject(&self, handle: &ConnectionHandle, reason: RejectReason) -> RejectReason {
        self.registry.remove(&handle.id).await;
        handle.close();
        self.metrics.connection_rejected();
        debug!(conn_id = %handle.id, reason = %reason, "Connection rejected");
        reason
    }

    /// Verifies the token and registers the session.
    async fn admit(
        &self,
        handle: &ConnectionHandle,
        token: Option<&str>,
    ) -> Result<UserId, RejectReason> {
        if handle.is_closed() {
            return Err(RejectReason::ConnectionClosed);
        }

        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(RejectReason::MissingToken)?;

        let verified = tokio::time::timeout(self.verify_timeout, self.verifier.verify(token))
            .await
            .map_err(|_| RejectReason::Timeout)?
            .map_err(RejectReason::Authentication)?;

        self.registry
            .register(handle.id, verified.user_id)
            .await
            .map_err(RejectReason::Registration)?;

        // Closed while verifying: the caller removes the fresh session.
        if handle.is_closed() {
            return Err(RejectReason::ConnectionClosed);
        }

        Ok(verified.user_id)
    }

    /// Force-closes every other connection held by `user_id`.
    ///
    /// Each evicted socket later runs [`handle_disconnect`](Self::handle_disconnect),
    /// so peers see one extra `clients-updated` per evicted connection.
    async fn evict_other_sessions(&self, user_id: &UserId, keep: &ConnectionId) {
        for conn_id in self.registry.connections_of(user_id).await {
            if conn_id == *keep {
                continue;
            }
            self.registry.remove(&conn_id).await;
            if self.pool.detach(&conn_id).is_some() {
                self.metrics.connection_closed();
            }
            info!(conn_id = %conn_id, user_id = %user_id, "Previous session evicted");
        }
    }

    /// Handles a socket going away, for any reason.
    ///
    /// Safe to call for connections that never registered.
    pub async fn handle_disconnect(&self, conn_id: &ConnectionId) {
        if self.pool.detach(conn_id).is_some() {
            self.metrics.connection_closed();
        }
        self.registry.remove(conn_id).await;

        info!(conn_id = %conn_id, "Client disconnected");

        self.broadcast_presence().await;
    }

    /// Dispatches one inbound text frame. Malformed frames are ignored.
    pub async fn handle_inbound(&self, conn_id: &ConnectionId, raw: &str) {
        match InboundEvent::parse(raw) {
            Ok(InboundEvent::MessageFromClient(payload)) => {
                self.relay_message(conn_id, payload).await;
            }
            Err(e) => {
                debug!(conn_id = %conn_id, error = %e, "Ignoring inbound frame");
            }
        }
    }

    /// Relays a chat message to every attached peer, the sender included.
    pub async fn relay_message(&self, sender: &ConnectionId, payload: NewMessage) -> BroadcastReport {
        let full_name = self.registry.display_name_of(sender).await;
        let event = OutboundEvent::MessageFromServer(ChatMessage::new(full_name, payload.message));

        let report = self.pool.broadcast(&event);
        self.metrics.message_relayed();
        self.metrics.record_broadcast(report);

        debug!(
            conn_id = %sender,
            delivered = report.delivered,
            dropped = report.dropped,
            "Chat message relayed"
        );
        report
    }

    /// Broadcasts the current presence snapshot to every attached peer.
    pub async fn broadcast_presence(&self) -> BroadcastReport {
        let snapshot = self.registry.list_active().await;
        let report = self.pool.broadcast(&OutboundEvent::ClientsUpdated(snapshot));
        self.metrics.record_broadcast(report);
        report
    }
}
