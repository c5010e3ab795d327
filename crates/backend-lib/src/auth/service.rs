// =============
// crates/backend-lib/src/auth/service.rs
// =============
//! Capability traits consumed by [`AuthUseCase`](super::AuthUseCase).
//!
//! Each trait is one narrow operation. Implementations are free to do I/O
//! and report failures as [`AppError`]; the use case hands those errors back
//! to its caller untouched.
use async_trait::async_trait;

use crate::error::AppError;

/// A stored account, as seen by the authentication flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Opaque unique identifier
    pub id: String,
    /// Hashed password (PHC string in production)
    pub password: String,
}

/// Look a user up by email
#[async_trait]
pub trait LoadUserByEmail: Send + Sync {
    async fn load(&self, email: &str) -> Result<Option<User>, AppError>;
}

/// Compare a plaintext value with a stored hash
#[async_trait]
pub trait Encrypt: Send + Sync {
    async fn compare(&self, value: &str, hash: &str) -> Result<bool, AppError>;
}

/// Issue an access token for a user id
#[async_trait]
pub trait GenerateToken: Send + Sync {
    async fn generate(&self, id: &str) -> Result<String, AppError>;
}

/// Record an issued access token on the user
#[async_trait]
pub trait UpdateAccessToken: Send + Sync {
    async fn update(&self, user_id: &str, access_token: &str) -> Result<(), AppError>;
}
