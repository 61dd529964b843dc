//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! condominium ledger test suite.
//!
//! # Modules
//!
//! - `fixtures`: Ready-made engines, periods and counterparty records
//! - `assertions`: Ledger-specific assertion helpers
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use assertions::*;
pub use generators::*;
