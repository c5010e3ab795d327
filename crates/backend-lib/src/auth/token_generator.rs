// ============================
// crates/backend-lib/src/auth/token_generator.rs
// ============================
//! Access token generation
//!
//! Tokens are HS256 JWTs whose subject is the user id. Each token carries a
//! random `jti` so two tokens issued in the same second still differ.
use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use jsonwebtoken::{encode, EncodingKey, Header};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::service::GenerateToken;
use crate::error::AppError;

/// Size of the random `jti` in bytes (128 bits of entropy)
const JTI_BYTES: usize = 16;

/// Default token lifetime
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// Longest accepted token lifetime
pub const MAX_TOKEN_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Claims carried by every access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Unique token id
    pub jti: String,
}

/** Generate a cryptographically secure random token with specified size
# Arguments
* `bytes` - The size of the random token in bytes
# Returns
A base64 URL-safe encoded string without padding */
pub fn generate_secure_token_with_size(bytes: usize) -> String {
    let mut buffer = vec![0u8; bytes];
    rand::rng().fill_bytes(&mut buffer);
    URL_SAFE_NO_PAD.encode(buffer)
}

/// [`GenerateToken`] capability signing JWTs with a shared secret
#[derive(Clone)]
pub struct JwtTokenGenerator {
    secret: String,
    ttl: Duration,
}

impl JwtTokenGenerator {
    pub fn new(secret: impl Into<String>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }
}

#[async_trait]
impl GenerateToken for JwtTokenGenerator {
    async fn generate(&self, id: &str) -> Result<String, AppError> {
        if self.secret.is_empty() {
            return Err(AppError::MissingParam("secret".to_string()));
        }
        if id.is_empty() {
            return Err(AppError::MissingParam("id".to_string()));
        }

        let now = chrono::Utc::now().timestamp();
        let exp = i64::try_from(self.ttl.as_secs())
            .ok()
            .and_then(|ttl| now.checked_add(ttl))
            .ok_or_else(|| AppError::Token(format!("token lifetime {:?} out of range", self.ttl)))?;
        let claims = Claims {
            sub: id.to_string(),
            iat: now,
            exp,
            jti: generate_secure_token_with_size(JTI_BYTES),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Token(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

    fn decode_claims(token: &str, secret: &str) -> Claims {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap()
        .claims
    }

    #[tokio::test]
    async fn test_generate_signs_user_id() {
        let sut = JwtTokenGenerator::new("secret", DEFAULT_TOKEN_TTL);
        let token = sut.generate("any_id").await.unwrap();

        let claims = decode_claims(&token, "secret");
        assert_eq!(claims.sub, "any_id");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[tokio::test]
    async fn test_generate_rejects_wrong_secret_on_decode() {
        let sut = JwtTokenGenerator::new("secret", DEFAULT_TOKEN_TTL);
        let token = sut.generate("any_id").await.unwrap();

        let result = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"other"),
            &Validation::new(Algorithm::HS256),
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_tokens_are_unique() {
        let sut = JwtTokenGenerator::new("secret", DEFAULT_TOKEN_TTL);
        let token1 = sut.generate("any_id").await.unwrap();
        let token2 = sut.generate("any_id").await.unwrap();
        assert_ne!(token1, token2);
    }

    #[tokio::test]
    async fn test_generate_requires_params() {
        let sut = JwtTokenGenerator::new("", DEFAULT_TOKEN_TTL);
        let result = sut.generate("any_id").await;
        assert!(matches!(result, Err(AppError::MissingParam(ref p)) if p == "secret"));

        let sut = JwtTokenGenerator::new("secret", DEFAULT_TOKEN_TTL);
        let result = sut.generate("").await;
        assert!(matches!(result, Err(AppError::MissingParam(ref p)) if p == "id"));
    }

    #[tokio::test]
    async fn test_generate_rejects_out_of_range_ttl() {
        for secs in [u64::MAX, i64::MAX as u64] {
            let sut = JwtTokenGenerator::new("secret", Duration::from_secs(secs));
            let result = sut.generate("any_id").await;
            assert!(matches!(result, Err(AppError::Token(_))), "ttl {secs}");
        }
    }

    #[tokio::test]
    async fn test_generate_with_max_ttl_expires_after_issue() {
        let sut = JwtTokenGenerator::new("secret", MAX_TOKEN_TTL);
        let token = sut.generate("any_id").await.unwrap();

        let claims = decode_claims(&token, "secret");
        assert_eq!(claims.exp - claims.iat, MAX_TOKEN_TTL.as_secs() as i64);
    }

    #[test]
    fn test_secure_token_size() {
        // 16 bytes of entropy encode to 22 base64 chars without padding
        assert_eq!(generate_secure_token_with_size(16).len(), 22);
        assert_ne!(
            generate_secure_token_with_size(16),
            generate_secure_token_with_size(16)
        );
    }
}
