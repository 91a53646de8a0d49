//! services/app/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The
//! `.env` file is used for local development.

use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the backend-as-a-service REST API.
    pub endpoint: String,
    pub project_id: String,
    /// Optional server key; session auth is used for user-scoped calls.
    pub api_key: Option<String>,
    pub database_id: String,
    /// Bucket holding uploaded guidebook files.
    pub bucket_id: String,
    /// Base URL of the hosted image-classification service.
    pub predict_url: String,
    /// Location of the local preference file (persisted UI language).
    pub prefs_path: PathBuf,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for
    /// development, but this is skipped in test environments to ensure tests
    /// are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let endpoint = require("MIMEA_ENDPOINT")?;
        let project_id = require("MIMEA_PROJECT_ID")?;
        let api_key = std::env::var("MIMEA_API_KEY").ok();
        let database_id = require("MIMEA_DATABASE_ID")?;
        let bucket_id =
            std::env::var("MIMEA_BUCKET_ID").unwrap_or_else(|_| "guidebooks".to_string());
        let predict_url = require("MIMEA_PREDICT_URL")?;

        let prefs_path = std::env::var("MIMEA_PREFS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./mimea-prefs.json"));

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            endpoint,
            project_id,
            api_key,
            database_id,
            bucket_id,
            predict_url,
            prefs_path,
            log_level,
        })
    }
}

fn require(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name.to_string()))
}
