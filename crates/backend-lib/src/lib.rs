// ============================
// authgate-backend-lib/src/lib.rs
// ============================
//! Core functionality for the `authgate` login server.

pub mod auth;
pub mod config;
pub mod error;
pub mod login_router;
pub mod metrics;
pub mod repositories;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use crate::auth::{AuthDependencies, AuthUseCase, Encrypter, JwtTokenGenerator};
use crate::config::Settings;
use crate::repositories::{LoadUserByEmailRepository, UpdateAccessTokenRepository};
use crate::storage::{ConnectionManager, MongoDriver};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Authentication use case
    pub auth: Arc<AuthUseCase>,
}

impl AppState {
    /// Create a new application state
    pub fn new(auth: AuthUseCase) -> Self {
        Self {
            auth: Arc::new(auth),
        }
    }

    /// Wire the production collaborators around a shared store
    pub fn compose(settings: &Settings, store: Arc<ConnectionManager<MongoDriver>>) -> Self {
        let auth = AuthUseCase::new(AuthDependencies {
            load_user_by_email: Some(Arc::new(LoadUserByEmailRepository::new(store.clone()))),
            update_access_token: Some(Arc::new(UpdateAccessTokenRepository::new(store))),
            encrypter: Some(Arc::new(Encrypter::new())),
            token_generator: Some(Arc::new(JwtTokenGenerator::new(
                settings.token_secret.clone(),
                settings.token_ttl(),
            ))),
        });
        Self::new(auth)
    }
}
