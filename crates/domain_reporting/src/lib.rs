//! Reporting Domain - Read-side derivations over the condominium ledger
//!
//! This crate provides:
//! - Trial balance, income statement and balance sheet
//! - The same reports scoped to one division
//! - Income and expense detail listings with per-account summaries
//! - An account hierarchy with rolled-up totals

pub mod detail;
pub mod engine;
pub mod error;
pub mod hierarchy;
pub mod statements;

pub use detail::{AuxiliarySummary, DetailKind, DetailLine, DetailSummary};
pub use engine::ReportingEngine;
pub use error::{ReportError, ReportResult};
pub use hierarchy::AccountNode;
pub use statements::{
    BalanceSheet, IncomeStatement, StatementLine, TrialBalance, TrialBalanceLine, NET_INCOME_LINE_CODE,
};
