//! Ledger domain errors
//!
//! Every business-rule failure is a `LedgerError`. Operations that can fail
//! for several reasons at once return a `Rejection`, which keeps the full
//! ordered list so callers can show every problem with an entry together.

use std::fmt;

use thiserror::Error;

use core_kernel::{JournalId, Money};
use crate::division::DivisionCode;
use crate::journal::JournalStatus;

/// Result alias for single-error ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Broad classification of ledger errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or rule-violating input
    Validation,
    /// A referenced journal, account, or division does not exist
    NotFound,
    /// The operation is not allowed in the target's current state
    State,
}

/// Errors that can occur in the ledger domain
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Journal date is required")]
    MissingDate,

    #[error("Journal must have at least one detail line")]
    NoDetails,

    #[error("Line {line}: account code is required")]
    MissingAccountCode { line: usize },

    #[error("Line {line}: amounts must not be negative")]
    NegativeAmount { line: usize },

    #[error("Line {line}: a line cannot carry both a debit and a credit")]
    BothSides { line: usize },

    #[error("Line {line}: a line must carry a debit or a credit amount")]
    NoAmount { line: usize },

    #[error("Line {line}: unknown account {code}")]
    UnknownAccount { line: usize, code: String },

    #[error("Account is inactive: {0}")]
    InactiveAccount(String),

    #[error("Account does not accept postings: {0}")]
    NonPostableAccount(String),

    #[error("Auxiliary ledger {auxiliary_code} not found on account {account_code}")]
    AuxiliaryLedgerNotFound {
        account_code: String,
        auxiliary_code: String,
    },

    #[error("Unbalanced journal: debits={debits}, credits={credits}, difference={difference}")]
    UnbalancedEntry {
        debits: Money,
        credits: Money,
        difference: Money,
    },

    #[error("Transfer from {from} to {to} is not permitted")]
    TransferNotPermitted { from: DivisionCode, to: DivisionCode },

    #[error("Transfer from {from} to {to} of {amount} exceeds the limit of {limit}")]
    TransferLimitExceeded {
        from: DivisionCode,
        to: DivisionCode,
        amount: Money,
        limit: Money,
    },

    #[error("Normal balance of account {0} cannot change while it carries a balance")]
    NormalBalanceLocked(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Division not found: {0}")]
    DivisionNotFound(String),

    #[error("Journal not found: {0}")]
    JournalNotFound(JournalId),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition {
        from: JournalStatus,
        to: JournalStatus,
    },

    #[error("Journal {0} is posted and cannot be modified")]
    PostedJournalImmutable(JournalId),

    #[error("Journal {0} is not posted")]
    JournalNotPosted(JournalId),

    #[error("Calculation error: {0}")]
    Calculation(String),
}

impl LedgerError {
    /// Classifies the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::AccountNotFound(_)
            | LedgerError::DivisionNotFound(_)
            | LedgerError::JournalNotFound(_) => ErrorKind::NotFound,
            LedgerError::InvalidStatusTransition { .. }
            | LedgerError::PostedJournalImmutable(_)
            | LedgerError::JournalNotPosted(_)
            | LedgerError::NormalBalanceLocked(_) => ErrorKind::State,
            _ => ErrorKind::Validation,
        }
    }
}

impl From<core_kernel::MoneyError> for LedgerError {
    fn from(err: core_kernel::MoneyError) -> Self {
        LedgerError::Calculation(err.to_string())
    }
}

/// A rejected ledger operation
///
/// Holds one or more errors in the order they were detected. A rejection
/// guarantees the ledger was left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    errors: Vec<LedgerError>,
}

impl Rejection {
    /// Creates a rejection from a list of errors
    pub fn new(errors: Vec<LedgerError>) -> Self {
        Self { errors }
    }

    /// The detected errors, in detection order
    pub fn errors(&self) -> &[LedgerError] {
        &self.errors
    }

    /// Human-readable messages for each error
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Kind of the first error, if any
    pub fn kind(&self) -> Option<ErrorKind> {
        self.errors.first().map(LedgerError::kind)
    }

    /// Returns true if any error matches the predicate
    pub fn any(&self, predicate: impl Fn(&LedgerError) -> bool) -> bool {
        self.errors.iter().any(predicate)
    }
}

impl From<LedgerError> for Rejection {
    fn from(err: LedgerError) -> Self {
        Self { errors: vec![err] }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join("; "))
    }
}

impl std::error::Error for Rejection {}
