//! Filesystem primitives for genlink
//!
//! Provides read-only inspection of live paths, SHA-256 content digests,
//! atomic symlink replacement and document loading.

pub mod checksum;
pub mod document;
pub mod error;
pub mod io;
pub mod path;
pub mod probe;

pub use document::{DocumentFormat, DocumentLoader};
pub use error::{Error, Result};
pub use path::resolve_link_target;
pub use probe::{FsProbe, HostFs, Observation};
