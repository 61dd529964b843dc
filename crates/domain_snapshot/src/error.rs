//! Snapshot errors

use thiserror::Error;

use domain_ledger::LedgerError;

/// Errors that can occur exporting or restoring a snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Unsupported snapshot version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Invalid {kind} record {code}: {message}")]
    InvalidRecord {
        kind: &'static str,
        code: String,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
