//! Core Kernel - Foundational types for the condominium ledger
//!
//! This crate provides the building blocks shared by every ledger crate:
//! - Money with precise decimal arithmetic (single currency)
//! - Date ranges for reporting periods
//! - Strongly-typed identifiers for journals and sub-ledger entries

pub mod money;
pub mod period;
pub mod identifiers;

pub use money::{Money, MoneyError, BALANCE_EPSILON};
pub use period::{DateRange, PeriodError};
pub use identifiers::{JournalId, AuxiliaryEntryId};
