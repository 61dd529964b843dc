//! Reporting errors

use thiserror::Error;

use domain_ledger::LedgerError;

/// Result type for reporting operations
pub type ReportResult<T> = Result<T, ReportError>;

/// Errors that can occur while deriving reports
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
