//! services/app/src/error.rs
//!
//! Defines the primary error type for the application shell.

use crate::config::ConfigError;
use mimea_core::ports::PortError;

/// The primary error type for the `app` service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core ports.
    #[error("Service port error: {0}")]
    Port(#[from] PortError),

    /// Represents a standard Input/Output error (e.g., reading an image).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
