//! CLI error handling

use std::path::PathBuf;

use thiserror::Error;

use core_kernel::PeriodError;
use domain_ledger::LedgerError;
use domain_reporting::ReportError;
use domain_snapshot::SnapshotError;

/// Errors that can occur during a reporting run
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Period(#[from] PeriodError),
}
