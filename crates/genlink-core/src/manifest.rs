//! Generation manifests
//!
//! A manifest maps absolute destination paths to the store path that should
//! populate them and how (symlink or copy). The previous generation's
//! manifest doubles as the provenance record for what this tool placed.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use genlink_fs::DocumentLoader;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The only manifest schema version understood.
pub const SUPPORTED_VERSION: u32 = 1;

/// How a manifest entry is placed on the filesystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// The destination is a symlink to the source
    Link,
    /// The destination is a regular-file copy of the source
    Copy,
    /// A type this build does not know; surfaces as an unknown transaction
    #[serde(other)]
    Unknown,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::Copy => "copy",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One managed path in a generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Store path the destination is populated from
    pub source: PathBuf,

    /// Placement kind
    #[serde(rename = "type")]
    pub kind: FileKind,

    /// Content hashes that may be overwritten regardless of provenance.
    ///
    /// Only meaningful on next-generation entries.
    #[serde(
        rename = "knownSha256Hashes",
        default,
        skip_serializing_if = "BTreeSet::is_empty"
    )]
    pub known_sha256_hashes: BTreeSet<String>,

    /// Digest of the copy placed by the previous activation.
    ///
    /// Only meaningful on previous-generation `copy` entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl ManifestEntry {
    fn new(source: impl Into<PathBuf>, kind: FileKind) -> Self {
        Self {
            source: source.into(),
            kind,
            known_sha256_hashes: BTreeSet::new(),
            hash: None,
        }
    }

    /// Entry placed as a symlink to `source`
    pub fn link(source: impl Into<PathBuf>) -> Self {
        Self::new(source, FileKind::Link)
    }

    /// Entry placed as a copy of `source`
    pub fn copy(source: impl Into<PathBuf>) -> Self {
        Self::new(source, FileKind::Copy)
    }

    /// Record the digest of the copy that was placed
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    /// Add hashes that may be overwritten unconditionally
    pub fn with_known_hashes<I, S>(mut self, hashes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_sha256_hashes
            .extend(hashes.into_iter().map(Into::into));
        self
    }

    /// Whether `hash` is pre-authorized for overwrite
    pub fn is_known_hash(&self, hash: &str) -> bool {
        self.known_sha256_hashes.contains(hash)
    }

    fn normalize_hashes(&mut self) {
        self.known_sha256_hashes = std::mem::take(&mut self.known_sha256_hashes)
            .into_iter()
            .map(|h| h.to_ascii_lowercase())
            .collect();
        if let Some(hash) = self.hash.as_mut() {
            hash.make_ascii_lowercase();
        }
    }
}

#[derive(Deserialize)]
struct ManifestHeader {
    version: u32,
}

/// A generation's complete set of managed paths
///
/// Entries are kept sorted by path so plans are deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Schema version
    pub version: u32,

    /// Managed paths keyed by absolute destination
    #[serde(default)]
    pub files: BTreeMap<PathBuf, ManifestEntry>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            version: SUPPORTED_VERSION,
            files: BTreeMap::new(),
        }
    }
}

impl Manifest {
    /// Create an empty manifest at the supported version
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate the manifest at `path`.
    ///
    /// The schema version is checked before the rest of the document is
    /// interpreted, so a manifest from an incompatible generation builder
    /// reports its version instead of a confusing parse error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, declares a
    /// version other than [`SUPPORTED_VERSION`], or has a relative path key.
    pub fn load(path: &Path) -> Result<Self> {
        let content = DocumentLoader::new().read(path)?;
        Self::parse(path, &content)
    }

    /// Parse manifest `content`, using `path` for format detection and errors.
    ///
    /// # Example
    ///
    /// ```
    /// use genlink_core::manifest::{FileKind, Manifest};
    /// use std::path::Path;
    ///
    /// let manifest = Manifest::parse(
    ///     Path::new("links.json"),
    ///     r#"{"version": 1, "files": {"/etc/foo": {"source": "/store/a", "type": "link"}}}"#,
    /// ).unwrap();
    ///
    /// assert_eq!(manifest.get(Path::new("/etc/foo")).unwrap().kind, FileKind::Link);
    /// ```
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let loader = DocumentLoader::new();

        let header: ManifestHeader = loader.parse(path, content)?;
        if header.version != SUPPORTED_VERSION {
            return Err(Error::UnsupportedVersion {
                path: path.to_path_buf(),
                version: header.version,
            });
        }

        let mut manifest: Manifest = loader.parse(path, content)?;
        manifest.validate(path)?;
        for entry in manifest.files.values_mut() {
            entry.normalize_hashes();
        }

        tracing::debug!(
            path = %path.display(),
            entries = manifest.files.len(),
            "Loaded manifest"
        );
        Ok(manifest)
    }

    fn validate(&self, origin: &Path) -> Result<()> {
        if let Some(relative) = self.files.keys().find(|p| !p.is_absolute()) {
            return Err(Error::InvalidManifest {
                path: origin.to_path_buf(),
                message: format!("path {} is not absolute", relative.display()),
            });
        }
        Ok(())
    }

    /// Add an entry, replacing any previous entry for `path`
    pub fn insert(&mut self, path: impl Into<PathBuf>, entry: ManifestEntry) {
        self.files.insert(path.into(), entry);
    }

    /// Builder form of [`Manifest::insert`]
    pub fn with_entry(mut self, path: impl Into<PathBuf>, entry: ManifestEntry) -> Self {
        self.insert(path, entry);
        self
    }

    pub fn get(&self, path: &Path) -> Option<&ManifestEntry> {
        self.files.get(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate over entries in path order
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &ManifestEntry)> {
        self.files.iter().map(|(p, e)| (p.as_path(), e))
    }
}
