//! Realtime gateway error types.

use thiserror::Error;

use teslo_core::error::AppError;

/// Why a connection attempt was refused.
///
/// Every variant is terminal for that one attempt only.
#[derive(Debug, Error)]
pub enum RejectReason {
    /// The handshake carried no token.
    #[error("missing authentication token")]
    MissingToken,
    /// The token failed signature or expiry checks.
    #[error("token verification failed: {0}")]
    Authentication(#[source] AppError),
    /// The verifier did not answer in time.
    #[error("token verification timed out")]
    Timeout,
    /// The token was valid but the identity could not be registered.
    #[error("session registration failed: {0}")]
    Registration(#[source] AppError),
    /// A newer session of the same user evicted this one mid-handshake.
    #[error("session evicted during handshake")]
    Evicted,
    /// The socket went away before the handshake finished.
    #[error("connection closed during handshake")]
    ConnectionClosed,
}

/// Why an inbound frame was ignored.
#[derive(Debug, Error)]
pub enum InboundError {
    /// Not a JSON envelope, or the payload has the wrong shape.
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The event name is not part of the protocol.
    #[error("unknown event '{0}'")]
    UnknownEvent(String),
}
