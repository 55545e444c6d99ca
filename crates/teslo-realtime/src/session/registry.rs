//! Session registry: the single source of truth for who is connected.
//!
//! Maps transport connection IDs to authenticated identities. The registry
//! holds no transport handles; the gateway joins the two by connection ID.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use teslo_core::result::AppResult;
use teslo_core::traits::IdentityResolver;
use teslo_core::types::id::{ConnectionId, UserId};

/// Authenticated binding of one connection to a user.
#[derive(Debug, Clone)]
pub struct Session {
    /// Connection this session belongs to.
    pub connection_id: ConnectionId,
    /// Authenticated user.
    pub user_id: UserId,
    /// Display name resolved at registration.
    pub full_name: String,
    /// Registration sequence, used to order snapshots.
    seq: u64,
}

/// One entry of a presence snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSession {
    /// Connection ID.
    pub connection_id: ConnectionId,
    /// User ID.
    pub user_id: UserId,
}

#[derive(Debug, Default)]
struct Sessions {
    by_connection: HashMap<ConnectionId, Session>,
    next_seq: u64,
}

/// In-memory registry of authenticated sessions.
///
/// One lock guards the whole map: mutations take the write half, snapshot
/// and lookup reads take the read half, so every read observes a
/// consistent state.
pub struct SessionRegistry {
    inner: RwLock<Sessions>,
    identities: Arc<dyn IdentityResolver>,
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("identities", &self.identities)
            .finish()
    }
}

impl SessionRegistry {
    /// Creates an empty registry backed by the given identity store.
    pub fn new(identities: Arc<dyn IdentityResolver>) -> Self {
        Self {
            inner: RwLock::new(Sessions::default()),
            identities,
        }
    }

    /// Registers (or overwrites) the session for `connection_id`.
    ///
    /// The display name is resolved before the map is touched, so a failed
    /// lookup leaves the registry unchanged.
    pub async fn register(&self, connection_id: ConnectionId, user_id: UserId) -> AppResult<()> {
        let full_name = self.identities.resolve_full_name(&user_id).await?;

        let mut sessions = self.inner.write().await;
        let seq = sessions.next_seq;
        sessions.next_seq += 1;
        sessions.by_connection.insert(
            connection_id,
            Session {
                connection_id,
                user_id,
                full_name,
                seq,
            },
        );

        debug!(conn_id = %connection_id, user_id = %user_id, "Session registered");
        Ok(())
    }

    /// Removes the session for `connection_id`, if any.
    pub async fn remove(&self, connection_id: &ConnectionId) -> Option<Session> {
        let removed = self.inner.write().await.by_connection.remove(connection_id);
        if removed.is_some() {
            debug!(conn_id = %connection_id, "Session removed");
        }
        removed
    }

    /// Presence snapshot in registration order.
    pub async fn list_active(&self) -> Vec<ActiveSession> {
        let sessions = self.inner.read().await;
        let mut active: Vec<&Session> = sessions.by_connection.values().collect();
        active.sort_by_key(|s| s.seq);
        active
            .into_iter()
            .map(|s| ActiveSession {
                connection_id: s.connection_id,
                user_id: s.user_id,
            })
            .collect()
    }

    /// Cached display name, or an empty string for unknown connections.
    pub async fn display_name_of(&self, connection_id: &ConnectionId) -> String {
        self.inner
            .read()
            .await
            .by_connection
            .get(connection_id)
            .map(|s| s.full_name.clone())
            .unwrap_or_default()
    }

    /// Looks up a full session record.
    pub async fn get(&self, connection_id: &ConnectionId) -> Option<Session> {
        self.inner
            .read()
            .await
            .by_connection
            .get(connection_id)
            .cloned()
    }

    /// All connections currently registered for `user_id`.
    pub async fn connections_of(&self, user_id: &UserId) -> Vec<ConnectionId> {
        self.inner
            .read()
            .await
            .by_connection
            .values()
            .filter(|s| s.user_id == *user_id)
            .map(|s| s.connection_id)
            .collect()
    }

    /// Number of registered sessions.
    pub async fn len(&self) -> usize {
        self.inner.read().await.by_connection.len()
    }

    /// Whether no session is registered.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.by_connection.is_empty()
    }

    /// Drops every session. Used at engine shutdown.
    pub async fn clear(&self) -> usize {
        let mut sessions = self.inner.write().await;
        let count = sessions.by_connection.len();
        sessions.by_connection.clear();
        count
    }
}
