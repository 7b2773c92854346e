//! Helpers shared by the genlink-core integration tests.

#![allow(dead_code)]

use genlink_core::{Transaction, TransactionKind};
use genlink_test_utils::MemoryFs;

/// Apply transactions to an in-memory filesystem the way the executor
/// applies them to a real one.
pub fn apply_in_memory(fs: &mut MemoryFs, transactions: &[Transaction]) {
    for transaction in transactions {
        match transaction.kind {
            TransactionKind::Link => {
                fs.symlink(transaction.destination.clone(), transaction.source.clone())
            }
            TransactionKind::Copy => {
                fs.copy(&transaction.source, transaction.destination.clone())
            }
            TransactionKind::Remove => {
                fs.remove(&transaction.source);
            }
            TransactionKind::Unknown => {}
        }
    }
}

/// Digest of `content` in manifest format.
pub fn sha(content: &str) -> String {
    genlink_fs::checksum::sha256_hex(content.as_bytes())
}
