// ============================
// authgate-backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use argon2::Argon2;
use async_trait::async_trait;
use scrypt::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Scrypt,
};
use zeroize::Zeroize;

use super::service::Encrypt;
use crate::error::AppError;

/// Hash a password using scrypt
pub fn hash_password(plain: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| AppError::Hash(e.to_string()))?
        .to_string();
    Ok(hash)
}

/// Verify a password against a PHC hash produced by scrypt or argon2
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    let verifiers: [&dyn PasswordVerifier; 2] = [&Scrypt, &Argon2::default()];
    parsed_hash.verify_password(&verifiers, plain).is_ok()
}

/// [`Encrypt`] capability over stored PHC password hashes
#[derive(Debug, Clone, Copy, Default)]
pub struct Encrypter;

impl Encrypter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Encrypt for Encrypter {
    async fn compare(&self, value: &str, hash: &str) -> Result<bool, AppError> {
        if value.is_empty() {
            return Err(AppError::MissingParam("value".to_string()));
        }
        if hash.is_empty() {
            return Err(AppError::MissingParam("hash".to_string()));
        }

        // Key derivation is deliberately slow; keep it off the async workers.
        let mut value = value.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || {
            let is_valid = verify_password(&hash, &value);
            value.zeroize();
            is_valid
        })
        .await
        .map_err(|e| AppError::Hash(e.to_string()))
    }
}
