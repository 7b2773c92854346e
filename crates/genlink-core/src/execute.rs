//! Transaction executor
//!
//! Applies a planned transaction list to the live filesystem, or renders it
//! as the equivalent shell commands in dry-run mode. Both modes go through
//! the same per-kind dispatch, so a dry run shows exactly what an apply run
//! would attempt.

use genlink_fs::io;
use serde::{Deserialize, Serialize};

use crate::mode::{Capabilities, RunMode};
use crate::transaction::{Transaction, TransactionKind};
use crate::{Error, Result};

/// A transaction the executor refused to run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedTransaction {
    pub transaction: Transaction,
    pub reason: String,
}

/// What the executor did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// Whether this was a dry run
    pub dry_run: bool,
    /// Rendered commands, one per transaction (dry run only)
    pub commands: Vec<String>,
    /// Transactions applied to the filesystem (apply only)
    pub applied: Vec<Transaction>,
    /// Transactions skipped because their kind cannot be executed
    pub skipped: Vec<SkippedTransaction>,
}

impl ExecutionReport {
    fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }
}

/// Runs transactions in order
#[derive(Debug, Clone, Copy)]
pub struct Executor {
    dry_run: bool,
    capabilities: Capabilities,
}

impl Executor {
    /// Executor honoring `mode.dry_run`
    pub fn new(mode: RunMode, capabilities: Capabilities) -> Self {
        Self {
            dry_run: mode.dry_run,
            capabilities,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Execute `transactions` in order.
    ///
    /// Transactions whose kind cannot be executed are reported in
    /// [`ExecutionReport::skipped`] and the rest still run.
    ///
    /// # Errors
    ///
    /// Stops at the first transaction that fails to apply. Transactions
    /// before it stay applied.
    pub fn execute(&self, transactions: &[Transaction]) -> Result<ExecutionReport> {
        let mut report = ExecutionReport::new(self.dry_run);

        for transaction in transactions {
            if let Some(reason) = self.unsupported(transaction) {
                tracing::warn!(%transaction, "{}", reason);
                report.skipped.push(SkippedTransaction {
                    transaction: transaction.clone(),
                    reason,
                });
                continue;
            }

            if self.dry_run {
                report.commands.push(transaction.to_string());
            } else {
                self.apply(transaction)?;
                tracing::info!(%transaction, "Applied");
                report.applied.push(transaction.clone());
            }
        }

        Ok(report)
    }

    fn unsupported(&self, transaction: &Transaction) -> Option<String> {
        match transaction.kind {
            TransactionKind::Link | TransactionKind::Remove => None,
            TransactionKind::Copy if self.capabilities.supports_copy => None,
            kind => Some(format!("Unknown transaction type {}", kind)),
        }
    }

    fn apply(&self, transaction: &Transaction) -> Result<()> {
        let outcome = match transaction.kind {
            TransactionKind::Link => {
                io::replace_symlink_atomic(&transaction.source, &transaction.destination)
            }
            TransactionKind::Copy => io::copy_file(&transaction.source, &transaction.destination),
            TransactionKind::Remove => io::remove_path(&transaction.source),
            // Filtered out by `unsupported` before dispatch
            TransactionKind::Unknown => Ok(()),
        };

        outcome.map_err(|source| Error::Execution {
            command: transaction.to_string(),
            source,
        })
    }
}
