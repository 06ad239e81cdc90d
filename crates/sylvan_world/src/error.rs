//! # World Error Types
//!
//! Errors are confined to start-up: loading and validating configuration.
//! Per-frame work (camera, reconcile, generation) never returns an error.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while setting up the world system.
#[derive(Error, Debug)]
pub enum WorldError {
    /// A configuration value breaks a streaming or placement invariant.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration text is not valid TOML for `WorldConfig`.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    ConfigIo {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Result type for world set-up operations.
pub type WorldResult<T> = Result<T, WorldError>;
