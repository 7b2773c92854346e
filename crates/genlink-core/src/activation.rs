//! Activation: plan, gate, and execute one generation switch
//!
//! The update pass always runs to completion first. Any problem stops the
//! activation before the removal pass and before anything is executed, so a
//! conflicted activation never mutates the filesystem.

use std::path::Path;

use genlink_fs::{FsProbe, HostFs};
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::execute::{ExecutionReport, Executor};
use crate::manifest::Manifest;
use crate::mode::{Capabilities, RunMode};
use crate::plan::{Planner, Problem};
use crate::transaction::Transaction;

/// How an activation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationStatus {
    /// Problems were found; nothing was executed
    Conflicted,
    /// Check-only run passed the conflict gate
    Checked,
    /// Transactions were rendered, not applied
    DryRun,
    /// Transactions were applied
    Applied,
}

/// Result of one activation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivationReport {
    pub status: ActivationStatus,
    /// Every path that blocked the activation
    pub problems: Vec<Problem>,
    /// Transactions handed to the executor; empty unless execution ran
    pub transactions: Vec<Transaction>,
    /// Executor output, when execution ran
    pub execution: Option<ExecutionReport>,
}

impl ActivationReport {
    fn stopped(status: ActivationStatus, problems: Vec<Problem>) -> Self {
        Self {
            status,
            problems,
            transactions: Vec::new(),
            execution: None,
        }
    }

    /// True unless the activation was blocked by conflicts
    pub fn is_success(&self) -> bool {
        self.status != ActivationStatus::Conflicted
    }
}

/// Drives the planner and executor for one generation switch
#[derive(Debug, Clone)]
pub struct Activation<P> {
    planner: Planner<P>,
    executor: Executor,
    mode: RunMode,
}

impl<P: FsProbe> Activation<P> {
    pub fn new(probe: P, mode: RunMode, capabilities: Capabilities) -> Self {
        Self {
            planner: Planner::new(probe).with_capabilities(capabilities),
            executor: Executor::new(mode, capabilities),
            mode,
        }
    }

    /// Switch the filesystem from `old` to `new`.
    ///
    /// # Errors
    ///
    /// Returns an error if inspecting the filesystem fails during planning,
    /// or if a transaction fails to apply. Conflicts are not errors; they
    /// are reported with [`ActivationStatus::Conflicted`].
    pub fn run(&self, old: &Manifest, new: &Manifest) -> Result<ActivationReport> {
        let updates = self.planner.plan_updates(old, new)?;

        if !updates.is_clear() {
            tracing::warn!(problems = updates.problems.len(), "Activation blocked by conflicts");
            return Ok(ActivationReport::stopped(
                ActivationStatus::Conflicted,
                updates.problems,
            ));
        }

        if self.mode.check_only {
            tracing::info!(
                updates = updates.transactions.len(),
                "Check passed, stopping before removals"
            );
            return Ok(ActivationReport::stopped(ActivationStatus::Checked, Vec::new()));
        }

        let mut transactions = updates.transactions;
        transactions.extend(self.planner.plan_removals(old, new)?);

        let execution = self.executor.execute(&transactions)?;
        let status = if self.executor.is_dry_run() {
            ActivationStatus::DryRun
        } else {
            ActivationStatus::Applied
        };

        tracing::info!(
            transactions = transactions.len(),
            skipped = execution.skipped.len(),
            dry_run = self.executor.is_dry_run(),
            "Activation finished"
        );

        Ok(ActivationReport {
            status,
            problems: Vec::new(),
            transactions,
            execution: Some(execution),
        })
    }
}

/// Load both manifests and activate against the host filesystem.
///
/// # Errors
///
/// Returns an error if either manifest cannot be loaded or is an
/// unsupported version, in which case the filesystem is never inspected.
pub fn activate_files(
    old_manifest: &Path,
    new_manifest: &Path,
    mode: RunMode,
    capabilities: Capabilities,
) -> Result<ActivationReport> {
    let old = Manifest::load(old_manifest)?;
    let new = Manifest::load(new_manifest)?;

    Activation::new(HostFs::new(), mode, capabilities).run(&old, &new)
}
