//! Path helpers for symlink targets and temporary siblings

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Suffix shared by every temporary link name this crate creates.
pub const TEMP_SUFFIX: &str = ".genlink-tmp";

/// Resolve the raw target of the symlink at `link` to the path it names.
///
/// Absolute targets are returned unchanged. Relative targets are joined onto
/// the directory containing the link. The join is purely lexical: `..` and
/// `.` components are kept as-is and nothing is canonicalized.
pub fn resolve_link_target(link: &Path, target: &Path) -> PathBuf {
    match link.parent() {
        Some(parent) => parent.join(target),
        None => target.to_path_buf(),
    }
}

/// Build a candidate temporary path next to `destination`.
///
/// The name is `.<file name>.<uuid>.genlink-tmp`; it lives in the same
/// directory as the destination so a later rename stays on one filesystem.
/// Returns `None` when `destination` has no parent or no file name.
pub fn temp_sibling(destination: &Path) -> Option<PathBuf> {
    let parent = destination.parent()?;
    let file_name = destination.file_name()?;

    let mut name = OsString::from(".");
    name.push(file_name);
    name.push(format!(".{}{}", uuid::Uuid::new_v4().simple(), TEMP_SUFFIX));
    Some(parent.join(name))
}
