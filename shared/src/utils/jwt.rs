use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use thiserror::Error;

use crate::models::claims::TokenClaims;

#[derive(Debug, Error, PartialEq)]
pub enum JwtError {
    #[error("Token invalid atau expired")]
    InvalidToken,

    #[error("JWT secret tidak ditemukan")]
    MissingSecret,

    #[error("Token type tidak valid untuk endpoint ini")]
    InvalidTokenType,
}

/// Validate JWT access token dan extract claims.
///
/// Secret di-pass dari config service, bukan dibaca dari env di sini.
pub fn validate_token(token: &str, secret: &str) -> Result<TokenClaims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::MissingSecret);
    }

    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("JWT decode gagal: {}", e);
        JwtError::InvalidToken
    })?;

    // Business endpoint hanya menerima access token
    if !token_data.claims.is_access_token() {
        return Err(JwtError::InvalidTokenType);
    }

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    const SECRET: &str = "test-secret-key-for-testing-only";

    fn create_test_token(token_type: &str, secret: &str, ttl_minutes: i64) -> (Uuid, String) {
        let now = Utc::now();
        let sub = Uuid::new_v4();
        let claims = TokenClaims {
            sub,
            email: "vendor@example.com".to_string(),
            exp: (now + Duration::minutes(ttl_minutes)).timestamp(),
            iat: now.timestamp(),
            token_type: token_type.to_string(),
            jti: "test-jti-123".to_string(),
        };

        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();

        (sub, token)
    }

    #[test]
    fn test_valid_access_token() {
        let (sub, token) = create_test_token("access", SECRET, 15);
        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, sub);
        assert_eq!(claims.email, "vendor@example.com");
    }

    #[test]
    fn test_reject_refresh_token() {
        let (_, token) = create_test_token("refresh", SECRET, 15);
        let result = validate_token(&token, SECRET);
        assert_eq!(result.unwrap_err(), JwtError::InvalidTokenType);
    }

    #[test]
    fn test_reject_wrong_secret() {
        let (_, token) = create_test_token("access", "another-secret", 15);
        let result = validate_token(&token, SECRET);
        assert_eq!(result.unwrap_err(), JwtError::InvalidToken);
    }

    #[test]
    fn test_reject_expired_token() {
        let (_, token) = create_test_token("access", SECRET, -30);
        let result = validate_token(&token, SECRET);
        assert_eq!(result.unwrap_err(), JwtError::InvalidToken);
    }

    #[test]
    fn test_invalid_token() {
        let result = validate_token("invalid.token.here", SECRET);
        assert_eq!(result.unwrap_err(), JwtError::InvalidToken);
    }

    #[test]
    fn test_missing_secret() {
        let (_, token) = create_test_token("access", SECRET, 15);
        let result = validate_token(&token, "");
        assert_eq!(result.unwrap_err(), JwtError::MissingSecret);
    }
}
