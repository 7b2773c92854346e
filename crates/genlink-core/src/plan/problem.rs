//! Conflicts found while planning

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Why a live path cannot be safely overwritten
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemReason {
    /// A symlink the previous generation did not place
    UnmanagedSymlink,
    /// A symlink the previous generation placed, since pointed elsewhere
    RetargetedSymlink,
    /// A regular file neither tracked nor pre-authorized
    UntrackedFile,
    /// A tracked copy whose content changed since it was placed
    ModifiedFile,
    /// The previous generation tracked a different kind of file here
    TypeMismatch,
    /// A regular file where copies are not supported
    CopyUnsupported,
    /// A directory or special file
    UnsupportedFileType,
}

impl ProblemReason {
    pub fn description(&self) -> &'static str {
        match self {
            Self::UnmanagedSymlink => "symlink not created by a previous generation",
            Self::RetargetedSymlink => "symlink changed since last activation",
            Self::UntrackedFile => "file not managed by a previous generation",
            Self::ModifiedFile => "file modified since last activation",
            Self::TypeMismatch => "previous generation placed a different file type",
            Self::CopyUnsupported => "regular file cannot be replaced in link-only mode",
            Self::UnsupportedFileType => "not a regular file or symlink",
        }
    }
}

impl std::fmt::Display for ProblemReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// A path that blocks the activation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub path: PathBuf,
    pub reason: ProblemReason,
}

impl Problem {
    pub fn new(path: impl Into<PathBuf>, reason: ProblemReason) -> Self {
        Self {
            path: path.into(),
            reason,
        }
    }
}

impl std::fmt::Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Existing file at path {} ({})", self.path.display(), self.reason)
    }
}
