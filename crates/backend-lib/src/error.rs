// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use authgate_common::{ErrorBody, ErrorDetail};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::storage::StoreError;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    /// A required collaborator was not wired in.
    #[error("Missing capability: {0}")]
    MissingCapability(&'static str),

    #[error("Missing param: {0}")]
    MissingParam(String),

    #[error("Invalid param: {0}")]
    InvalidParam(String),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Password hash error: {0}")]
    Hash(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingParam(_) | AppError::InvalidParam(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingCapability(_) => "CFG_001",
            AppError::Config(_) => "CFG_002",
            AppError::MissingParam(_) => "VAL_001",
            AppError::InvalidParam(_) => "VAL_002",
            AppError::Unauthorized => "AUTH_001",
            AppError::Store(_) => "DB_001",
            AppError::Database(_) => "DB_002",
            AppError::Token(_) => "TOKEN_001",
            AppError::Hash(_) => "HASH_001",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            // Caller-input errors name the offending field and nothing else.
            AppError::MissingParam(_) | AppError::InvalidParam(_) => self.to_string(),
            AppError::Unauthorized => "Authentication failed".to_string(),
            _ => "An internal server error occurred".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "request failed");
        }

        // Use detailed messages in development, sanitized in production
        let message = if cfg!(debug_assertions) {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message,
            },
        };

        (status, axum::Json(body)).into_response()
    }
}
