//! Identity store seed configuration.

use serde::{Deserialize, Serialize};

use crate::types::id::UserId;

/// Users loaded into the in-memory identity directory at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Seed users.
    #[serde(default)]
    pub users: Vec<SeedUser>,
}

/// A single seeded user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedUser {
    /// User ID, the `id` claim of issued tokens.
    pub id: UserId,
    /// Display name used in chat relays.
    pub full_name: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Inactive users are refused by the realtime gateway.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}
