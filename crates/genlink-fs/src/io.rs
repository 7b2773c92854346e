//! Filesystem mutations applied by the executor
//!
//! Link placement uses a create-temp-then-rename strategy so the destination
//! is never observed half-created: an existing file or link at the
//! destination is replaced in one rename instead of unlink-then-relink.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::{Error, Result, path};

/// Create the directory that will contain `path`, if it is missing.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    Ok(())
}

/// Atomically point `destination` at `source`.
///
/// Creates the parent directory if needed, then creates a symlink under a
/// fresh temporary sibling name and renames it onto `destination`. Another
/// process may race us for the temporary name, so creation is retried with a
/// new candidate until it succeeds or fails for a reason other than
/// `AlreadyExists`.
pub fn replace_symlink_atomic(source: &Path, destination: &Path) -> Result<()> {
    ensure_parent_dir(destination)?;

    let temp_path = loop {
        let candidate = path::temp_sibling(destination)
            .ok_or_else(|| Error::invalid_path(destination, "no parent directory or file name"))?;

        match symlink(source, &candidate) {
            Ok(()) => break candidate,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::debug!(candidate = %candidate.display(), "Temporary link name taken, retrying");
            }
            Err(e) => return Err(Error::io(&candidate, e)),
        }
    };

    if let Err(e) = fs::rename(&temp_path, destination) {
        // Best effort: do not leave the temporary link behind
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(destination, e));
    }

    Ok(())
}

/// Copy the content of `source` to `destination`, overwriting in place.
///
/// A symlink at `destination` is unlinked first so the copy never writes
/// through it into whatever the link points at.
pub fn copy_file(source: &Path, destination: &Path) -> Result<()> {
    ensure_parent_dir(destination)?;

    let is_symlink = fs::symlink_metadata(destination)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false);
    if is_symlink {
        fs::remove_file(destination).map_err(|e| Error::io(destination, e))?;
    }

    fs::copy(source, destination).map_err(|e| Error::io(destination, e))?;
    Ok(())
}

/// Delete the file or symlink at `path`.
pub fn remove_path(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| Error::io(path, e))
}

#[cfg(unix)]
fn symlink(source: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(source, link)
}

#[cfg(windows)]
fn symlink(source: &Path, link: &Path) -> std::io::Result<()> {
    if source.is_dir() {
        std::os::windows::fs::symlink_dir(source, link)
    } else {
        std::os::windows::fs::symlink_file(source, link)
    }
}
