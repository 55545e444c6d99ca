//! Identity lookup contract.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::id::UserId;

/// Resolves user identities to display data.
#[async_trait]
pub trait IdentityResolver: Send + Sync + std::fmt::Debug + 'static {
    /// Return the full name of `user_id`.
    ///
    /// Fails when the user does not exist or may not be admitted.
    async fn resolve_full_name(&self, user_id: &UserId) -> AppResult<String>;
}
