//! Snapshot Domain - Export and restore of the condominium ledger
//!
//! Snapshots carry journals and counterparty records as JSON. Restoring
//! replays them through the journal engine instead of copying balances.

pub mod error;
pub mod owner;
pub mod snapshot;

pub use error::SnapshotError;
pub use owner::{UnitOwner, Vendor};
pub use snapshot::{RestoreFailure, RestoreReport, Snapshot, SnapshotJournal, SNAPSHOT_VERSION};
