//! In-memory user directory.

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use teslo_core::config::IdentityConfig;
use teslo_core::error::AppError;
use teslo_core::result::AppResult;
use teslo_core::traits::IdentityResolver;
use teslo_core::types::id::UserId;

/// A user known to the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// User ID.
    pub id: UserId,
    /// Display name.
    pub full_name: String,
    /// Contact email.
    pub email: String,
    /// Inactive users cannot open realtime sessions.
    pub is_active: bool,
}

/// Thread-safe user directory keyed by user ID.
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: DashMap<UserId, UserRecord>,
}

impl UserDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory seeded from configuration.
    pub fn from_config(config: &IdentityConfig) -> Self {
        let directory = Self::new();
        for seed in &config.users {
            directory.upsert(UserRecord {
                id: seed.id,
                full_name: seed.full_name.clone(),
                email: seed.email.clone(),
                is_active: seed.is_active,
            });
        }
        debug!(count = directory.len(), "User directory seeded");
        directory
    }

    /// Inserts or replaces a user record.
    pub fn upsert(&self, record: UserRecord) {
        self.users.insert(record.id, record);
    }

    /// Looks up a user record.
    pub fn get(&self, id: &UserId) -> Option<UserRecord> {
        self.users.get(id).map(|entry| entry.value().clone())
    }

    /// Number of known users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the directory has no users.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl IdentityResolver for UserDirectory {
    async fn resolve_full_name(&self, user_id: &UserId) -> AppResult<String> {
        let record = self
            .get(user_id)
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;

        if !record.is_active {
            return Err(AppError::authorization(format!(
                "User {user_id} is not active"
            )));
        }

        Ok(record.full_name)
    }
}
