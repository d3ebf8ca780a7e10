//! Error types for config loading, validation, and enhancement.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned while loading, validating, or enhancing config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config file exists for the requested variant.
    #[error("Couldn't find a config of type \"{variant}\" in \"{}\".", directory.display())]
    NotFound { variant: String, directory: PathBuf },
    /// Reading a config file failed.
    #[error("failed to read config: {0}")]
    Read(#[from] std::io::Error),
    /// The config file exists but is not valid JSON5.
    #[error(transparent)]
    Parse(#[from] json5::Error),
    /// Converting JSON values into the typed config failed.
    #[error("failed to decode config: {0}")]
    Decode(#[from] serde_json::Error),
    /// A specific field failed validation.
    #[error("invalid config at {path}: {message}")]
    InvalidField { path: String, message: String },
    /// Generic validation failure.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// The package manifest is missing, unreadable, or has no usable name.
    #[error("failed to read package manifest {}: {message}", path.display())]
    ManifestRead { path: PathBuf, message: String },
}

impl ConfigError {
    /// True when the error means "no file" rather than "bad file".
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::NotFound { .. })
    }
}
