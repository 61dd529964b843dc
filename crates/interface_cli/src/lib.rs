//! Command-line interface over ledger snapshots
//!
//! Restores a snapshot, optionally closes the period, and derives the
//! whole-ledger and per-division reports for printing as JSON.

pub mod config;
pub mod error;
pub mod report;

pub use config::ReportConfig;
pub use error::CliError;
pub use report::{build_report, load_snapshot, DivisionReport, LedgerReport};
