// ============================
// authgate-backend-lib/src/config.rs
// ============================
//! Configuration management.
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use crate::auth::{DEFAULT_TOKEN_TTL, MAX_TOKEN_TTL};
use crate::error::AppError;

/// Default config file, looked up in the working directory by the binary
pub const DEFAULT_CONFIG_FILE: &str = "authgate.toml";

/// Prefix of environment variables that override file settings
pub const ENV_PREFIX: &str = "AUTHGATE_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Document store connection string
    pub mongo_url: String,
    /// Database holding the `users` collection
    pub mongo_database: String,
    /// HMAC secret for access tokens
    pub token_secret: String,
    /// Access token lifetime in seconds
    pub token_ttl_secs: u64,
    /// Log level
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5050)),
            mongo_url: "mongodb://localhost:27017".to_string(),
            mongo_database: "clean-node-api".to_string(),
            token_secret: "secret".to_string(),
            token_ttl_secs: DEFAULT_TOKEN_TTL.as_secs(),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from `path` and the environment. A missing file is
    /// not an error; defaults fill the gaps.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings: Settings = Self::figment(path).extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Provider chain: defaults, then the TOML file, then `AUTHGATE_*`
    pub fn figment<P: AsRef<Path>>(path: P) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<(), AppError> {
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(AppError::Config(format!(
                "unknown log level '{}'",
                self.log_level
            )));
        }
        if self.token_secret.is_empty() {
            return Err(AppError::Config("token_secret must not be empty".to_string()));
        }
        if self.token_ttl_secs == 0 {
            return Err(AppError::Config("token_ttl_secs must be positive".to_string()));
        }
        if self.token_ttl_secs > MAX_TOKEN_TTL.as_secs() {
            return Err(AppError::Config(format!(
                "token_ttl_secs must not exceed {}",
                MAX_TOKEN_TTL.as_secs()
            )));
        }
        if self.mongo_database.is_empty() {
            return Err(AppError::Config("mongo_database must not be empty".to_string()));
        }
        Ok(())
    }

    /// Access token lifetime
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }
}
