//! # teslo-realtime
//!
//! Real-time WebSocket gateway for the Teslo shop. Provides:
//!
//! - Token-authenticated connection admission
//! - An in-memory session registry (connection → user)
//! - Presence snapshots (`clients-updated`) after every join and leave
//! - Best-effort chat relay (`message-from-server`) to every connected peer

pub mod connection;
pub mod error;
pub mod gateway;
pub mod message;
pub mod metrics;
pub mod server;
pub mod session;

pub use connection::{ConnectionHandle, ConnectionPool};
pub use error::RejectReason;
pub use gateway::MessagesGateway;
pub use server::RealtimeEngine;
pub use session::SessionRegistry;
