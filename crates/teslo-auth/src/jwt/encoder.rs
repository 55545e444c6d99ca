//! JWT token minting.
//!
//! Token issuance belongs to the external auth service; this encoder exists
//! for local tooling and tests that need tokens the gateway will accept.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use teslo_core::config::AuthConfig;
use teslo_core::error::AppError;
use teslo_core::types::id::UserId;

use super::claims::Claims;

/// Creates signed HS256 tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Token lifetime.
    ttl: TimeDelta,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl: ttl_from_hours(config.jwt_ttl_hours),
        }
    }

    /// Issues a token for `user_id` valid for the configured TTL.
    pub fn issue(&self, user_id: UserId) -> Result<(String, DateTime<Utc>), AppError> {
        let exp = Utc::now()
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let token = self.issue_expiring_at(user_id, exp)?;
        Ok((token, exp))
    }

    /// Issues a token with an explicit expiration instant.
    pub fn issue_expiring_at(
        &self,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let claims = Claims {
            id: user_id,
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }
}

/// Converts a configured TTL, saturating instead of overflowing.
fn ttl_from_hours(hours: u64) -> TimeDelta {
    i64::try_from(hours)
        .ok()
        .and_then(TimeDelta::try_hours)
        .unwrap_or(TimeDelta::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(ttl_hours: u64) -> AuthConfig {
        AuthConfig {
            jwt_secret: "s3cret".to_string(),
            jwt_leeway_seconds: 0,
            jwt_ttl_hours: ttl_hours,
        }
    }

    #[test]
    fn test_issue_uses_configured_ttl() {
        let before = Utc::now();
        let (_, exp) = JwtEncoder::new(&config(2)).issue(UserId::new()).unwrap();

        assert!(exp >= before + TimeDelta::hours(2));
        assert!(exp <= Utc::now() + TimeDelta::hours(2));
    }

    #[test]
    fn test_oversized_ttl_saturates() {
        assert_eq!(ttl_from_hours(u64::MAX), TimeDelta::MAX);

        let (token, exp) = JwtEncoder::new(&config(u64::MAX))
            .issue(UserId::new())
            .unwrap();

        assert!(!token.is_empty());
        assert_eq!(exp, DateTime::<Utc>::MAX_UTC);
    }
}
