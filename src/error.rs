//! Error types shared across the crate.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error returned by CLI commands, configuration and logging setup.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Prefix registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Settings scan failed: {0}")]
    Compliance(#[from] ComplianceError),

    #[error("Invalid sessions input: {0}")]
    SessionsError(String),

    #[error("No sessions match {0}")]
    NoTargets(String),

    #[error("Unrecognized session name: {0}")]
    UnknownSession(String),

    #[error("Prune failed: {0}")]
    PruneError(String),

    #[error("Failed to render output: {0}")]
    OutputError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// Registration failures. These are setup-time errors and are not retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("prefix '{prefix}' is already registered to rig '{existing}' (wanted '{rig}')")]
    DuplicatePrefix {
        prefix: String,
        existing: String,
        rig: String,
    },

    #[error("rig '{rig}' is already registered with prefix '{existing}' (wanted '{prefix}')")]
    DuplicateRig {
        rig: String,
        existing: String,
        prefix: String,
    },

    #[error("invalid prefix '{0}': must be non-empty and must not contain '-'")]
    InvalidPrefix(String),

    #[error("prefix '{0}' is reserved for town-level sessions")]
    ReservedPrefix(String),

    #[error("rig name cannot be empty")]
    EmptyRigName,
}

/// Scan-level failures: the scan could not complete. Distinct from stale settings.
#[derive(Debug, Error)]
pub enum ComplianceError {
    #[error("town root {0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
