//! Transactions: the only unit of filesystem mutation
//!
//! Naming note: `source` is always the store path and `destination` the live
//! path, which is the reverse of how `ln` names its arguments. A `remove`
//! has no store path, so the live path is stored in `source` and repeated in
//! `destination`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::manifest::{FileKind, ManifestEntry};

/// What a transaction does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Link,
    Copy,
    Remove,
    /// Carried through from a manifest type this build does not know
    Unknown,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::Copy => "copy",
            Self::Remove => "remove",
            Self::Unknown => "unknown",
        }
    }
}

impl From<FileKind> for TransactionKind {
    fn from(kind: FileKind) -> Self {
        match kind {
            FileKind::Link => Self::Link,
            FileKind::Copy => Self::Copy,
            FileKind::Unknown => Self::Unknown,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One planned filesystem mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub source: PathBuf,
    pub destination: PathBuf,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

impl Transaction {
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        kind: TransactionKind,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            kind,
        }
    }

    /// Place `entry` at `destination` according to its kind
    pub fn place(entry: &ManifestEntry, destination: impl Into<PathBuf>) -> Self {
        Self::new(entry.source.clone(), destination, entry.kind.into())
    }

    pub fn link(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self::new(source, destination, TransactionKind::Link)
    }

    pub fn copy(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self::new(source, destination, TransactionKind::Copy)
    }

    pub fn remove(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::new(path.clone(), path, TransactionKind::Remove)
    }

    /// The live path this transaction mutates
    pub fn target(&self) -> &Path {
        match self.kind {
            TransactionKind::Remove => &self.source,
            _ => &self.destination,
        }
    }

    /// Shell command equivalent to this transaction.
    ///
    /// Returns `None` for [`TransactionKind::Unknown`], which has no
    /// equivalent.
    pub fn command(&self) -> Option<String> {
        match self.kind {
            TransactionKind::Link => Some(format!(
                "ln -s {} {}",
                self.source.display(),
                self.destination.display()
            )),
            TransactionKind::Copy => Some(format!(
                "cp {} {}",
                self.source.display(),
                self.destination.display()
            )),
            TransactionKind::Remove => Some(format!("rm {}", self.source.display())),
            TransactionKind::Unknown => None,
        }
    }
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.command() {
            Some(command) => f.write_str(&command),
            None => write!(
                f,
                "{} {} {}",
                self.kind,
                self.source.display(),
                self.destination.display()
            ),
        }
    }
}
