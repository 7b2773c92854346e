//! Read-only inspection of live filesystem state
//!
//! [`FsProbe`] is the only way the planner looks at the filesystem. The
//! host implementation talks to the real filesystem; tests substitute an
//! in-memory fake.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{Error, Result, checksum};

/// What currently occupies a path, without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// Nothing exists at the path, not even a broken symlink.
    Missing,
    /// A symlink, dangling or not.
    Symlink,
    /// A regular file.
    File,
    /// A directory, socket, device, or other non-file entry.
    Other,
}

impl Observation {
    /// Equivalent of `lexists`: true for anything but [`Observation::Missing`].
    pub fn exists(self) -> bool {
        !matches!(self, Self::Missing)
    }
}

/// Filesystem inspection capability used during planning.
pub trait FsProbe {
    /// Classify the entry at `path` without following symlinks.
    fn observe(&self, path: &Path) -> Result<Observation>;

    /// Read the raw target of the symlink at `path`.
    fn read_link(&self, path: &Path) -> Result<PathBuf>;

    /// SHA-256 of the regular file at `path`, as lowercase hex.
    ///
    /// Callers must only ask for this when the hash is needed to make a
    /// decision; implementations are free to make it expensive.
    fn file_sha256(&self, path: &Path) -> Result<String>;
}

/// [`FsProbe`] backed by the host filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostFs;

impl HostFs {
    pub fn new() -> Self {
        Self
    }
}

impl FsProbe for HostFs {
    fn observe(&self, path: &Path) -> Result<Observation> {
        match fs::symlink_metadata(path) {
            Ok(metadata) => {
                let file_type = metadata.file_type();
                if file_type.is_symlink() {
                    Ok(Observation::Symlink)
                } else if file_type.is_file() {
                    Ok(Observation::File)
                } else {
                    Ok(Observation::Other)
                }
            }
            // A missing parent directory also means nothing lives at the path
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                Ok(Observation::Missing)
            }
            Err(e) => Err(Error::io(path, e)),
        }
    }

    fn read_link(&self, path: &Path) -> Result<PathBuf> {
        fs::read_link(path).map_err(|e| Error::io(path, e))
    }

    fn file_sha256(&self, path: &Path) -> Result<String> {
        tracing::trace!(path = %path.display(), "Hashing file");
        checksum::file_sha256(path).map_err(|e| Error::io(path, e))
    }
}

impl<P: FsProbe + ?Sized> FsProbe for &P {
    fn observe(&self, path: &Path) -> Result<Observation> {
        (**self).observe(path)
    }

    fn read_link(&self, path: &Path) -> Result<PathBuf> {
        (**self).read_link(path)
    }

    fn file_sha256(&self, path: &Path) -> Result<String> {
        (**self).file_sha256(path)
    }
}
