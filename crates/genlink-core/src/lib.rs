//! Reconciliation core for generation file linking
//!
//! Moves a live filesystem from one generation's set of managed files to
//! the next without clobbering anything this tool did not place:
//!
//! - **Manifests**: per-generation maps of destination path to store source
//! - **Planner**: classifies every path into a transaction or a problem,
//!   using the previous manifest as provenance
//! - **Executor**: applies transactions (atomic symlink replacement, copies,
//!   removals) or renders them as shell commands
//! - **Activation**: the all-or-nothing gate between the two
//!
//! # Architecture
//!
//! ```text
//!            genlink-cli
//!                 |
//!            genlink-core
//!   manifest -> plan -> activation -> execute
//!                 |                       |
//!              FsProbe               genlink-fs::io
//!                 \                     /
//!                      genlink-fs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use genlink_core::{Activation, Capabilities, Manifest, ManifestEntry, RunMode};
//! use genlink_fs::HostFs;
//!
//! let old = Manifest::new();
//! let new = Manifest::new().with_entry("/etc/foo", ManifestEntry::link("/store/a"));
//!
//! let report = Activation::new(HostFs::new(), RunMode::dry_run(), Capabilities::default())
//!     .run(&old, &new)
//!     .unwrap();
//! assert!(report.is_success());
//! ```

pub mod activation;
pub mod error;
pub mod execute;
pub mod manifest;
pub mod mode;
pub mod plan;
pub mod transaction;

pub use activation::{Activation, ActivationReport, ActivationStatus, activate_files};
pub use error::{Error, Result};
pub use execute::{ExecutionReport, Executor, SkippedTransaction};
pub use manifest::{FileKind, Manifest, ManifestEntry, SUPPORTED_VERSION};
pub use mode::{Capabilities, RunMode};
pub use plan::{Plan, Planner, Problem, ProblemReason};
pub use transaction::{Transaction, TransactionKind};
