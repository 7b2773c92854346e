//! [`MemoryFs`]: an in-memory filesystem for planner tests.
//!
//! Paths are stored exactly as given; there is no directory hierarchy and
//! nothing is normalized, which matches how the planner compares paths.

use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Error as IoError, ErrorKind};
use std::path::{Path, PathBuf};

use genlink_fs::{Error, FsProbe, Observation, Result, checksum};

/// A node stored in [`MemoryFs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    File(Vec<u8>),
    Symlink(PathBuf),
    Dir,
}

/// In-memory [`FsProbe`] with hash-call accounting and failure injection.
///
/// # Example
///
/// ```rust
/// use genlink_fs::{FsProbe, Observation};
/// use genlink_test_utils::MemoryFs;
/// use std::path::Path;
///
/// let fs = MemoryFs::new()
///     .with_symlink("/etc/foo", "/store/a")
///     .with_file("/etc/bar", "user content");
///
/// assert_eq!(fs.observe(Path::new("/etc/foo")).unwrap(), Observation::Symlink);
/// assert_eq!(fs.hash_calls(), 0);
/// ```
#[derive(Debug, Default)]
pub struct MemoryFs {
    nodes: BTreeMap<PathBuf, Node>,
    unreadable: BTreeSet<PathBuf>,
    hash_calls: Cell<usize>,
}

impl MemoryFs {
    /// Create an empty filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MemoryFs::write`].
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl AsRef<[u8]>) -> Self {
        self.write(path, content);
        self
    }

    /// Builder form of [`MemoryFs::symlink`].
    pub fn with_symlink(mut self, path: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        self.symlink(path, target);
        self
    }

    /// Builder form of [`MemoryFs::mkdir`].
    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.mkdir(path);
        self
    }

    /// Make hashing `path` fail with a permission error.
    pub fn with_unreadable(mut self, path: impl Into<PathBuf>) -> Self {
        self.unreadable.insert(path.into());
        self
    }

    /// Create or replace a regular file.
    pub fn write(&mut self, path: impl Into<PathBuf>, content: impl AsRef<[u8]>) {
        self.nodes
            .insert(path.into(), Node::File(content.as_ref().to_vec()));
    }

    /// Create or replace a symlink with a raw target.
    pub fn symlink(&mut self, path: impl Into<PathBuf>, target: impl Into<PathBuf>) {
        self.nodes.insert(path.into(), Node::Symlink(target.into()));
    }

    /// Create a directory entry.
    pub fn mkdir(&mut self, path: impl Into<PathBuf>) {
        self.nodes.insert(path.into(), Node::Dir);
    }

    /// Copy the content of the file at `source` to `destination`.
    ///
    /// # Panics
    ///
    /// Panics if `source` is not a regular file.
    pub fn copy(&mut self, source: &Path, destination: impl Into<PathBuf>) {
        let content = match self.nodes.get(source) {
            Some(Node::File(content)) => content.clone(),
            other => panic!("MemoryFs::copy: {} is not a file: {:?}", source.display(), other),
        };
        self.write(destination, content);
    }

    /// Remove whatever is at `path`, returning it.
    pub fn remove(&mut self, path: &Path) -> Option<Node> {
        self.nodes.remove(path)
    }

    /// Look at the node stored at `path`.
    pub fn node(&self, path: &Path) -> Option<&Node> {
        self.nodes.get(path)
    }

    /// Number of times [`FsProbe::file_sha256`] has been called.
    pub fn hash_calls(&self) -> usize {
        self.hash_calls.get()
    }
}

fn io_error(path: &Path, kind: ErrorKind, message: &str) -> Error {
    Error::io(path, IoError::new(kind, message.to_string()))
}

impl FsProbe for MemoryFs {
    fn observe(&self, path: &Path) -> Result<Observation> {
        Ok(match self.nodes.get(path) {
            None => Observation::Missing,
            Some(Node::Symlink(_)) => Observation::Symlink,
            Some(Node::File(_)) => Observation::File,
            Some(Node::Dir) => Observation::Other,
        })
    }

    fn read_link(&self, path: &Path) -> Result<PathBuf> {
        match self.nodes.get(path) {
            Some(Node::Symlink(target)) => Ok(target.clone()),
            Some(_) => Err(io_error(path, ErrorKind::InvalidInput, "not a symlink")),
            None => Err(io_error(path, ErrorKind::NotFound, "no such file")),
        }
    }

    fn file_sha256(&self, path: &Path) -> Result<String> {
        self.hash_calls.set(self.hash_calls.get() + 1);

        if self.unreadable.contains(path) {
            return Err(io_error(path, ErrorKind::PermissionDenied, "permission denied"));
        }

        match self.nodes.get(path) {
            Some(Node::File(content)) => Ok(checksum::sha256_hex(content)),
            Some(_) => Err(io_error(path, ErrorKind::InvalidInput, "not a regular file")),
            None => Err(io_error(path, ErrorKind::NotFound, "no such file")),
        }
    }
}
