//! Error types for genlink-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that end a CLI run with a nonzero exit code
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from genlink-core
    #[error(transparent)]
    Core(#[from] genlink_core::Error),

    /// Failed to write output
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Failed to render JSON output
    #[error("Failed to render JSON output: {0}")]
    Json(#[from] serde_json::Error),

    /// The activation was blocked by conflicting paths
    #[error("{count} conflicting path(s), nothing was changed")]
    Conflicts { count: usize },
}
