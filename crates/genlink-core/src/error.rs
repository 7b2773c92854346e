//! Error types for genlink-core

use std::path::PathBuf;

/// Result type for genlink-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in genlink-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Manifest declares a schema version other than the one understood
    #[error("Unknown schema version {version} in manifest {path}")]
    UnsupportedVersion { path: PathBuf, version: u32 },

    /// Manifest parsed but violates a structural rule
    #[error("Invalid manifest {path}: {message}")]
    InvalidManifest { path: PathBuf, message: String },

    /// A transaction failed while being applied
    #[error("Failed to apply `{command}`: {source}")]
    Execution {
        command: String,
        #[source]
        source: genlink_fs::Error,
    },

    /// Filesystem error from genlink-fs
    #[error(transparent)]
    Fs(#[from] genlink_fs::Error),
}
