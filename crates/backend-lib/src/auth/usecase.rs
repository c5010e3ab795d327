// ============================
// crates/backend-lib/src/auth/usecase.rs
// ============================
//! Email/password authentication and access-token issuance.
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, info};

use super::service::{Encrypt, GenerateToken, LoadUserByEmail, UpdateAccessToken};
use crate::error::AppError;
use crate::metrics::{AUTH_ATTEMPT, AUTH_NO_MATCH, AUTH_SUCCESS};

/// Result of an authentication attempt that did not fail.
///
/// Unknown email and wrong password both map to `NoMatch`; callers cannot
/// tell them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Token(String),
    NoMatch,
}

impl AuthOutcome {
    /// The issued token, if any
    pub fn into_token(self) -> Option<String> {
        match self {
            AuthOutcome::Token(token) => Some(token),
            AuthOutcome::NoMatch => None,
        }
    }
}

/// Collaborators for [`AuthUseCase`]. Any of them may be left out; the
/// omission is reported when `authenticate` is called.
///
/// Only types implementing the matching capability trait can be supplied:
///
/// ```compile_fail
/// use std::sync::Arc;
/// use authgate_backend_lib::auth::AuthDependencies;
///
/// struct NotARepository;
///
/// let deps = AuthDependencies {
///     load_user_by_email: Some(Arc::new(NotARepository)),
///     ..Default::default()
/// };
/// ```
#[derive(Clone, Default)]
pub struct AuthDependencies {
    pub load_user_by_email: Option<Arc<dyn LoadUserByEmail>>,
    pub update_access_token: Option<Arc<dyn UpdateAccessToken>>,
    pub encrypter: Option<Arc<dyn Encrypt>>,
    pub token_generator: Option<Arc<dyn GenerateToken>>,
}

/// Authentication orchestrator
pub struct AuthUseCase {
    deps: AuthDependencies,
}

impl AuthUseCase {
    /// Never fails; missing collaborators surface on the first call.
    pub fn new(deps: AuthDependencies) -> Self {
        Self { deps }
    }

    /** Authenticate `email`/`password` and issue an access token.
    Guards run before any collaborator is called, in this order: lookup,
    compare and generate capabilities, then email, then password. The
    persist capability is only checked once a token has been generated.
    # Returns
    `AuthOutcome::Token` after the token was recorded against the user,
    `AuthOutcome::NoMatch` for an unknown email or a wrong password. */
    pub async fn authenticate(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<AuthOutcome, AppError> {
        let load_user_by_email = self
            .deps
            .load_user_by_email
            .as_ref()
            .ok_or(AppError::MissingCapability("lookup"))?;
        let encrypter = self
            .deps
            .encrypter
            .as_ref()
            .ok_or(AppError::MissingCapability("compare"))?;
        let token_generator = self
            .deps
            .token_generator
            .as_ref()
            .ok_or(AppError::MissingCapability("generate"))?;

        let email = required(email, "email")?;
        let password = required(password, "password")?;

        counter!(AUTH_ATTEMPT).increment(1);
        debug!(%email, "authenticating");

        let Some(user) = load_user_by_email.load(email).await? else {
            debug!(%email, "no account for email");
            counter!(AUTH_NO_MATCH).increment(1);
            return Ok(AuthOutcome::NoMatch);
        };

        if !encrypter.compare(password, &user.password).await? {
            debug!(user_id = %user.id, "password mismatch");
            counter!(AUTH_NO_MATCH).increment(1);
            return Ok(AuthOutcome::NoMatch);
        }

        let access_token = token_generator.generate(&user.id).await?;

        self.deps
            .update_access_token
            .as_ref()
            .ok_or(AppError::MissingCapability("persist"))?
            .update(&user.id, &access_token)
            .await?;

        info!(user_id = %user.id, "access token issued");
        counter!(AUTH_SUCCESS).increment(1);
        Ok(AuthOutcome::Token(access_token))
    }
}

fn required<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, AppError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::MissingParam(name.to_string()))
}
