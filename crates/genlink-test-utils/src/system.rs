//! [`TestSystem`]: a temporary root standing in for a managed machine.
//!
//! Layout under the temporary directory:
//!
//! - `store/`: immutable sources that links and copies point at
//! - `root/`: the live filesystem being reconciled
//! - `generations/`: manifest documents

use std::fs;
use std::path::{Path, PathBuf};

use genlink_fs::checksum;
use serde::Serialize;
use tempfile::TempDir;

/// A temporary managed system with helper methods for setup and assertion.
///
/// # Example
///
/// ```rust,no_run
/// use genlink_test_utils::TestSystem;
///
/// let system = TestSystem::new();
/// let source = system.store("a", "content");
/// system.symlink("etc/foo", &source);
/// system.assert_symlink("etc/foo", &source);
/// ```
pub struct TestSystem {
    temp_dir: TempDir,
}

impl Default for TestSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSystem {
    /// Create an empty system with `store/`, `root/` and `generations/`.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        for dir in ["store", "root", "generations"] {
            fs::create_dir_all(temp_dir.path().join(dir)).unwrap();
        }
        Self { temp_dir }
    }

    /// The temporary directory holding everything.
    pub fn base(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute live path for `relative` under `root/`.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.base().join("root").join(relative)
    }

    /// Write an immutable store object and return its absolute path.
    pub fn store(&self, name: &str, content: &str) -> PathBuf {
        let path = self.base().join("store").join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Write a regular file at a live path, creating parents.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    /// Create a symlink at a live path, creating parents.
    #[cfg(unix)]
    pub fn symlink(&self, relative: &str, target: impl AsRef<Path>) -> PathBuf {
        let path = self.path(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::os::unix::fs::symlink(target, &path).unwrap();
        path
    }

    /// Serialize `manifest` as JSON under `generations/` and return its path.
    pub fn write_manifest<T: Serialize>(&self, name: &str, manifest: &T) -> PathBuf {
        let content = serde_json::to_string_pretty(manifest).unwrap();
        self.write_manifest_str(name, &content)
    }

    /// Write raw manifest text under `generations/` and return its path.
    pub fn write_manifest_str(&self, name: &str, content: &str) -> PathBuf {
        let path = self.base().join("generations").join(name);
        fs::write(&path, content).unwrap();
        path
    }

    /// SHA-256 of `content` in manifest format.
    pub fn sha256(content: &str) -> String {
        checksum::sha256_hex(content.as_bytes())
    }

    /// Whether anything, including a dangling symlink, exists at `relative`.
    pub fn exists(&self, relative: &str) -> bool {
        fs::symlink_metadata(self.path(relative)).is_ok()
    }

    /// Read a live regular file.
    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).unwrap()
    }

    /// Assert that `relative` is a symlink pointing at `target`.
    pub fn assert_symlink(&self, relative: &str, target: impl AsRef<Path>) {
        let path = self.path(relative);
        let actual = fs::read_link(&path)
            .unwrap_or_else(|e| panic!("{} is not a symlink: {}", path.display(), e));
        assert_eq!(
            actual,
            target.as_ref(),
            "symlink {} points at the wrong target",
            path.display()
        );
    }

    /// Assert that `relative` is a regular file with `content`.
    pub fn assert_file(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        let metadata = fs::symlink_metadata(&path)
            .unwrap_or_else(|e| panic!("{} does not exist: {}", path.display(), e));
        assert!(
            metadata.file_type().is_file(),
            "{} is not a regular file",
            path.display()
        );
        assert_eq!(self.read(relative), content);
    }

    /// Assert that nothing exists at `relative`.
    pub fn assert_missing(&self, relative: &str) {
        assert!(
            !self.exists(relative),
            "{} should not exist",
            self.path(relative).display()
        );
    }
}
