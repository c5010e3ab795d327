// ============================
// authgate-backend-lib/src/login_router.rs
// ============================
//! HTTP surface for the authentication use case.
use authgate_common::{LoginRequest, LoginResponse};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue},
    routing::post,
    Json, Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::debug;
use zeroize::Zeroize;

use crate::auth::AuthOutcome;
use crate::error::AppError;
use crate::validation;
use crate::AppState;

/// Create the API router
///
/// Every response, not only preflights, carries wildcard
/// `access-control-allow-{origin,methods,headers}`.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let wildcard = HeaderValue::from_static("*");

    Router::new()
        .route("/api/login", post(login))
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            wildcard.clone(),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            wildcard.clone(),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            wildcard,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `POST /api/login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(mut request) = payload.map_err(|rejection| {
        debug!(%rejection, "malformed login body");
        AppError::InvalidParam("body".to_string())
    })?;

    let outcome = authenticate(&state, &request).await;
    if let Some(password) = request.password.as_mut() {
        password.zeroize();
    }

    match outcome? {
        AuthOutcome::Token(access_token) => Ok(Json(LoginResponse { access_token })),
        AuthOutcome::NoMatch => Err(AppError::Unauthorized),
    }
}

async fn authenticate(state: &AppState, request: &LoginRequest) -> Result<AuthOutcome, AppError> {
    let email = request.email.as_deref().filter(|e| !e.is_empty());
    let password = request.password.as_deref().filter(|p| !p.is_empty());

    let Some(email) = email else {
        return Err(AppError::MissingParam("email".to_string()));
    };
    if password.is_none() {
        return Err(AppError::MissingParam("password".to_string()));
    }
    validation::validate_email(email).map_err(|error| {
        debug!(%error, "rejected login email");
        AppError::InvalidParam("email".to_string())
    })?;

    state.auth.authenticate(Some(email), password).await
}
