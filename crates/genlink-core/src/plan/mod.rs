//! Reconciliation planner
//!
//! Classifies every managed path into a transaction, a no-op, or a problem
//! by comparing live state (through an [`FsProbe`]) against the previous
//! generation's manifest, which records what this tool placed.
//!
//! Planning runs in two passes:
//!
//! 1. **Updates**: every path in the next generation. Anything that cannot
//!    be proven tool-placed and unmodified becomes a [`Problem`].
//! 2. **Removals**: every path only in the previous generation. Anything
//!    that cannot be proven tool-placed and unmodified is left alone; this
//!    pass never reports problems.
//!
//! Callers must not run the removal pass, or execute anything, while the
//! update pass reports problems.

mod problem;

pub use problem::{Problem, ProblemReason};

use std::path::Path;

use genlink_fs::{FsProbe, Observation, resolve_link_target};
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::manifest::{FileKind, Manifest, ManifestEntry};
use crate::mode::Capabilities;
use crate::transaction::Transaction;

/// Planner output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Transactions to apply, in order
    pub transactions: Vec<Transaction>,
    /// Paths that block the activation
    pub problems: Vec<Problem>,
}

impl Plan {
    /// True when nothing blocks execution
    pub fn is_clear(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Outcome of classifying one path in the update pass
#[derive(Debug)]
enum Decision {
    Apply(Transaction),
    Converged,
    Conflict(ProblemReason),
}

/// Computes transactions that move the filesystem from one generation to
/// the next.
#[derive(Debug, Clone)]
pub struct Planner<P> {
    probe: P,
    capabilities: Capabilities,
}

impl<P: FsProbe> Planner<P> {
    /// Create a planner with copy support enabled
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            capabilities: Capabilities::default(),
        }
    }

    /// Restrict or extend the placement kinds the planner may emit
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Run both passes, skipping removals when the update pass conflicts.
    ///
    /// When problems are found the returned plan carries no transactions at
    /// all, so nothing can be applied by accident.
    pub fn plan(&self, old: &Manifest, new: &Manifest) -> Result<Plan> {
        let mut plan = self.plan_updates(old, new)?;
        if !plan.is_clear() {
            plan.transactions.clear();
            return Ok(plan);
        }

        let removals = self.plan_removals(old, new)?;
        plan.transactions.extend(removals);
        Ok(plan)
    }

    /// Update pass over every path in `new`.
    ///
    /// Collects every problem rather than stopping at the first, so a single
    /// run shows the operator the full set.
    pub fn plan_updates(&self, old: &Manifest, new: &Manifest) -> Result<Plan> {
        let mut plan = Plan::default();

        for (path, entry) in new.iter() {
            match self.classify_update(path, entry, old.get(path))? {
                Decision::Apply(transaction) => {
                    tracing::debug!(path = %path.display(), kind = %transaction.kind, "Planned update");
                    plan.transactions.push(transaction);
                }
                Decision::Converged => {
                    tracing::debug!(path = %path.display(), "Already up to date");
                }
                Decision::Conflict(reason) => {
                    tracing::debug!(path = %path.display(), %reason, "Conflict");
                    plan.problems.push(Problem::new(path, reason));
                }
            }
        }

        Ok(plan)
    }

    /// Removal pass over paths in `old` that `new` no longer manages.
    ///
    /// A path is removed only when it is exactly what the previous
    /// generation placed. Everything else is skipped silently.
    pub fn plan_removals(&self, old: &Manifest, new: &Manifest) -> Result<Vec<Transaction>> {
        let mut removals = Vec::new();

        for (path, entry) in old.iter().filter(|(p, _)| !new.contains(p)) {
            if self.is_removable(path, entry)? {
                tracing::debug!(path = %path.display(), "Planned removal");
                removals.push(Transaction::remove(path));
            }
        }

        Ok(removals)
    }

    fn classify_update(
        &self,
        path: &Path,
        entry: &ManifestEntry,
        previous: Option<&ManifestEntry>,
    ) -> Result<Decision> {
        match self.probe.observe(path)? {
            Observation::Missing => Ok(Decision::Apply(Transaction::place(entry, path))),
            Observation::Symlink => self.classify_symlink(path, entry, previous),
            Observation::File => self.classify_file(path, entry, previous),
            Observation::Other => Ok(Decision::Conflict(ProblemReason::UnsupportedFileType)),
        }
    }

    fn classify_symlink(
        &self,
        path: &Path,
        entry: &ManifestEntry,
        previous: Option<&ManifestEntry>,
    ) -> Result<Decision> {
        let target = self.link_target(path)?;
        // A copy entry is only converged once a regular file sits here
        if entry.kind == FileKind::Link && target == entry.source {
            return Ok(Decision::Converged);
        }

        let decision = match previous {
            Some(prev) if prev.kind == FileKind::Link && target == prev.source => {
                Decision::Apply(Transaction::place(entry, path))
            }
            Some(prev) if prev.kind == FileKind::Link => {
                Decision::Conflict(ProblemReason::RetargetedSymlink)
            }
            Some(_) => Decision::Conflict(ProblemReason::TypeMismatch),
            None => Decision::Conflict(ProblemReason::UnmanagedSymlink),
        };
        Ok(decision)
    }

    fn classify_file(
        &self,
        path: &Path,
        entry: &ManifestEntry,
        previous: Option<&ManifestEntry>,
    ) -> Result<Decision> {
        if !self.capabilities.supports_copy {
            return Ok(Decision::Conflict(ProblemReason::CopyUnsupported));
        }

        let live_hash = self.probe.file_sha256(path)?;

        if entry.kind == FileKind::Copy
            && self.source_hash(entry).as_deref() == Some(live_hash.as_str())
        {
            return Ok(Decision::Converged);
        }

        if entry.is_known_hash(&live_hash) {
            return Ok(Decision::Apply(Transaction::place(entry, path)));
        }

        let decision = match previous {
            Some(prev) if prev.kind == FileKind::Copy => {
                if prev.hash.as_deref() == Some(live_hash.as_str()) {
                    Decision::Apply(Transaction::place(entry, path))
                } else {
                    Decision::Conflict(ProblemReason::ModifiedFile)
                }
            }
            Some(_) => Decision::Conflict(ProblemReason::TypeMismatch),
            None => Decision::Conflict(ProblemReason::UntrackedFile),
        };
        Ok(decision)
    }

    fn is_removable(&self, path: &Path, entry: &ManifestEntry) -> Result<bool> {
        let removable = match self.probe.observe(path)? {
            Observation::Missing => false,
            Observation::Symlink => {
                entry.kind == FileKind::Link && self.link_target(path)? == entry.source
            }
            Observation::File => {
                self.capabilities.supports_copy
                    && entry.kind == FileKind::Copy
                    && entry.hash.is_some()
                    && entry.hash.as_deref() == Some(self.probe.file_sha256(path)?.as_str())
            }
            Observation::Other => false,
        };

        if !removable {
            tracing::debug!(path = %path.display(), "Leaving stale path in place");
        }
        Ok(removable)
    }

    fn link_target(&self, path: &Path) -> Result<std::path::PathBuf> {
        let raw = self.probe.read_link(path)?;
        Ok(resolve_link_target(path, &raw))
    }

    /// Digest of a copy entry's store content, if it can be read.
    fn source_hash(&self, entry: &ManifestEntry) -> Option<String> {
        match self.probe.file_sha256(&entry.source) {
            Ok(hash) => Some(hash),
            Err(e) => {
                tracing::debug!(source = %entry.source.display(), error = %e, "Cannot hash store source");
                None
            }
        }
    }
}
