//! JWT token validation.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use teslo_core::config::AuthConfig;
use teslo_core::error::AppError;
use teslo_core::traits::{TokenVerifier, VerifiedToken};

use super::claims::Claims;

/// Validates HS256-signed JWT tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.jwt_leeway_seconds;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes a token, checking signature and expiration.
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::authentication("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::authentication("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::authentication("Invalid token signature")
                    }
                    _ => AppError::authentication(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[async_trait]
impl TokenVerifier for JwtDecoder {
    async fn verify(&self, token: &str) -> Result<VerifiedToken, AppError> {
        let claims = self.decode_token(token)?;
        Ok(VerifiedToken { user_id: claims.id })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use teslo_core::error::ErrorKind;
    use teslo_core::types::id::UserId;

    use super::*;
    use crate::jwt::encoder::JwtEncoder;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            jwt_leeway_seconds: 0,
            jwt_ttl_hours: 1,
        }
    }

    #[tokio::test]
    async fn test_verify_valid_token() {
        let cfg = config("s3cret");
        let user_id = UserId::new();
        let (token, _) = JwtEncoder::new(&cfg).issue(user_id).unwrap();

        let verified = JwtDecoder::new(&cfg).verify(&token).await.unwrap();
        assert_eq!(verified.user_id, user_id);
    }

    #[tokio::test]
    async fn test_verify_rejects_wrong_secret() {
        let (token, _) = JwtEncoder::new(&config("one")).issue(UserId::new()).unwrap();

        let err = JwtDecoder::new(&config("two")).verify(&token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, "Invalid token signature");
    }

    #[tokio::test]
    async fn test_verify_rejects_expired_token() {
        let cfg = config("s3cret");
        let expired_at = Utc::now() - Duration::minutes(10);
        let token = JwtEncoder::new(&cfg)
            .issue_expiring_at(UserId::new(), expired_at)
            .unwrap();

        let err = JwtDecoder::new(&cfg).verify(&token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, "Token has expired");
    }

    #[tokio::test]
    async fn test_verify_rejects_garbage() {
        let err = JwtDecoder::new(&config("s3cret"))
            .verify("definitely.not.a-jwt")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }
}
