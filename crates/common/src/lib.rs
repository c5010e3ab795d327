// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! used for communication between login clients and the `authgate` server.
//! This module defines the JSON bodies of the login endpoint.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/login`
/// # Fields
/// * `email` - Account email, may be missing
/// * `password` - Plaintext password, may be missing
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Successful login response
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Issued access token
    pub access_token: String,
}

/// Error details returned with every non-2xx response
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    /// Stable machine-readable code (e.g. `VAL_001`)
    pub code: String,
    /// Human-readable message
    pub message: String,
}

/// Envelope around [`ErrorDetail`]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}
