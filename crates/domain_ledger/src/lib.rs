//! Ledger Domain - Double-entry bookkeeping for a condominium association
//!
//! This crate implements the ledger core:
//! - Hierarchical chart of accounts with counterparty sub-ledgers
//! - Segregated divisions (management, reserve, parking) and transfer rules
//! - Journal validation and the DRAFT → SUBMITTED → APPROVED → POSTED lifecycle
//! - Opening balances and period closing into retained surplus
//!
//! All balance changes go through [`JournalEngine`].

pub mod account;
pub mod auxiliary;
pub mod chart;
pub mod closing;
pub mod division;
pub mod engine;
pub mod error;
pub mod journal;
pub mod opening;
pub mod standard_chart;
mod validation;

pub use account::{Account, AccountDefinition, AccountType, AuxiliaryKind, NormalBalance};
pub use auxiliary::{AuxiliaryLedger, AuxiliaryTransaction};
pub use chart::ChartOfAccounts;
pub use closing::{ClosingEngine, ClosingEntry, ClosingReport, ClosingResult, SurplusAccountResolver};
pub use division::{Division, DivisionCode, DivisionRegistry};
pub use engine::{JournalEngine, JOURNAL_NUMBER_WIDTH};
pub use error::{ErrorKind, LedgerError, LedgerResult, Rejection};
pub use journal::{
    CreateOptions, Journal, JournalDetail, JournalDetailInput, JournalInput, JournalResponse,
    JournalStatus,
};
pub use opening::{OpeningBalance, OpeningEntry};
pub use standard_chart::StandardChart;
