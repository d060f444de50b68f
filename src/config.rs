//! Configuration management for stegoboard.
//!
//! Configuration can be set via environment variables:
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//! - `DATABASE_PATH` - Optional. SQLite database file. Defaults to `stegoboard.db`.
//! - `JWT_SECRET` - Required unless `DEV_MODE=true`. Secret for session tokens.
//! - `JWT_TTL_DAYS` - Optional. Session token lifetime. Defaults to `30`.
//! - `DEV_MODE` - Optional. When `true`, a built-in development signing
//!   secret is used if `JWT_SECRET` is absent. Defaults to `false`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// SQLite database path
    pub database_path: PathBuf,

    /// Secret used to sign session JWTs
    pub jwt_secret: Option<String>,

    /// Session token lifetime in days
    pub jwt_ttl_days: i64,

    /// Development mode (auth relaxed)
    pub dev_mode: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `JWT_SECRET` is not set
    /// outside of dev mode.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let database_path = std::env::var("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("stegoboard.db"));

        let dev_mode = std::env::var("DEV_MODE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let jwt_secret = std::env::var("JWT_SECRET").ok();
        if jwt_secret.is_none() && !dev_mode {
            return Err(ConfigError::MissingEnvVar("JWT_SECRET".to_string()));
        }

        let jwt_ttl_days = std::env::var("JWT_TTL_DAYS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("JWT_TTL_DAYS".to_string(), format!("{}", e)))?;

        Ok(Self {
            host,
            port,
            database_path,
            jwt_secret,
            jwt_ttl_days,
            dev_mode,
        })
    }
}
