//! SHA-256 digests in the manifest format
//!
//! Manifests record content hashes as bare lowercase hex (no algorithm
//! prefix), so every digest produced here uses that form.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Compute the SHA-256 digest of in-memory content as lowercase hex.
pub fn sha256_hex(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

/// Compute the SHA-256 digest of a file's contents as lowercase hex.
///
/// The file is streamed through the hasher rather than read into memory.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn file_sha256(path: &Path) -> std::io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    std::io::copy(&mut reader, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}
