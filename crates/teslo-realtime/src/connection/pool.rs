//! Connection pool: tracks which sockets are reachable.
//!
//! The pool is the transport's "broadcast to all" capability. It knows
//! nothing about identities; the session registry does.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{error, info};

use teslo_core::types::id::ConnectionId;

use crate::message::types::OutboundEvent;

use super::handle::ConnectionHandle;

/// Outcome of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Frames queued on a connection.
    pub delivered: u64,
    /// Frames dropped (full buffer or closed peer).
    pub dropped: u64,
}

/// Thread-safe pool of attached connections.
#[derive(Debug, Default)]
pub struct ConnectionPool {
    by_id: DashMap<ConnectionId, Arc<ConnectionHandle>>,
}

impl ConnectionPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes a connection reachable by broadcasts.
    pub fn attach(&self, handle: Arc<ConnectionHandle>) {
        self.by_id.insert(handle.id, handle);
    }

    /// Removes a connection from the pool and closes it.
    pub fn detach(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        let (_, handle) = self.by_id.remove(conn_id)?;
        handle.close();
        Some(handle)
    }

    /// Whether a connection is attached.
    pub fn contains(&self, conn_id: &ConnectionId) -> bool {
        self.by_id.contains_key(conn_id)
    }

    /// Number of attached connections.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether no connection is attached.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Serializes `event` once and queues it on every attached connection.
    ///
    /// Best effort: a peer that cannot take the frame is skipped and the
    /// rest still receive it.
    pub fn broadcast(&self, event: &OutboundEvent) -> BroadcastReport {
        let frame = match serde_json::to_string(event) {
            Ok(f) => f,
            Err(e) => {
                error!(error = %e, "Failed to serialize broadcast event");
                return BroadcastReport::default();
            }
        };

        let targets: Vec<Arc<ConnectionHandle>> =
            self.by_id.iter().map(|entry| entry.value().clone()).collect();

        let mut report = BroadcastReport::default();
        for conn in &targets {
            if conn.send(frame.clone()) {
                report.delivered += 1;
            } else {
                report.dropped += 1;
            }
        }
        report
    }

    /// Detaches and closes every connection.
    pub fn close_all(&self) -> usize {
        let ids: Vec<ConnectionId> = self.by_id.iter().map(|entry| *entry.key()).collect();
        let closed = ids.iter().filter(|id| self.detach(id).is_some()).count();
        info!(count = closed, "All connections closed");
        closed
    }
}
