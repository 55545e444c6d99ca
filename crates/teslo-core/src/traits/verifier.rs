//! Token verification contract.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::id::UserId;

/// Identity extracted from a token that passed signature and expiry checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    /// The authenticated user.
    pub user_id: UserId,
}

/// Verifies signed tokens presented during a socket handshake.
///
/// Failures are returned as `AppError` values (never panics) so the
/// caller can branch on them and reject the connection.
#[async_trait]
pub trait TokenVerifier: Send + Sync + std::fmt::Debug + 'static {
    /// Check signature and expiry of `token` and return its identity.
    async fn verify(&self, token: &str) -> AppResult<VerifiedToken>;
}
