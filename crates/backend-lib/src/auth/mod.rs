// ============================
// authgate-backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod password;
mod service;
pub mod token_generator;
mod usecase;

pub use password::{hash_password, verify_password, Encrypter};
pub use service::{Encrypt, GenerateToken, LoadUserByEmail, UpdateAccessToken, User};
pub use token_generator::{JwtTokenGenerator, DEFAULT_TOKEN_TTL, MAX_TOKEN_TTL};
pub use usecase::{AuthDependencies, AuthOutcome, AuthUseCase};
