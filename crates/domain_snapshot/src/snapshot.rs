//! Snapshot export and restore
//!
//! A snapshot is the journal history plus the counterparty records, not a
//! copy of balances. Restoring clears the engine and replays every journal
//! through the normal creation and lifecycle path, so a restored ledger is
//! re-validated and its balances re-derived.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use domain_ledger::{
    AccountDefinition, CreateOptions, DivisionCode, Journal, JournalDetailInput, JournalEngine,
    JournalInput, JournalStatus, Rejection, StandardChart,
};
use crate::error::SnapshotError;
use crate::owner::{UnitOwner, Vendor};

/// Format version written by this crate
pub const SNAPSHOT_VERSION: u32 = 1;

/// One journal as exported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotJournal {
    pub number: String,
    pub date: NaiveDate,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division: Option<DivisionCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub details: Vec<JournalDetailInput>,
    pub status: JournalStatus,
}

impl SnapshotJournal {
    fn from_journal(journal: &Journal) -> Self {
        let input = journal.to_input();
        Self {
            number: journal.number.clone(),
            date: journal.date,
            description: input.description,
            division: input.division,
            reference: input.reference,
            details: input.details,
            status: journal.status,
        }
    }

    fn to_input(&self) -> JournalInput {
        JournalInput {
            date: Some(self.date),
            description: self.description.clone(),
            division: self.division,
            reference: self.reference.clone(),
            details: self.details.clone(),
        }
    }

    fn sequence(&self) -> Option<u64> {
        self.number.parse().ok()
    }
}

/// Exported ledger state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: u32,
    pub export_date: DateTime<Utc>,
    #[serde(default)]
    pub unit_owners: Vec<UnitOwner>,
    #[serde(default)]
    pub vendors: Vec<Vendor>,
    #[serde(default)]
    pub journals: Vec<SnapshotJournal>,
}

/// A journal that could not be replayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreFailure {
    pub number: String,
    pub messages: Vec<String>,
}

/// Outcome of a restore
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreReport {
    pub unit_owners: usize,
    pub vendors: usize,
    pub restored: usize,
    pub failures: Vec<RestoreFailure>,
}

impl RestoreReport {
    /// Every journal replayed
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

impl Snapshot {
    /// Exports the engine's journals with the given counterparty records
    pub fn capture(engine: &JournalEngine, owners: &[UnitOwner], vendors: &[Vendor]) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            export_date: Utc::now(),
            unit_owners: owners.to_vec(),
            vendors: vendors.to_vec(),
            journals: engine.journals().iter().map(SnapshotJournal::from_journal).collect(),
        }
    }

    /// Serializes to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses JSON and checks the format version
    ///
    /// # Errors
    ///
    /// - `Serialization` if the text is not a snapshot
    /// - `UnsupportedVersion` if it was written by another format version
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        snapshot.check_version()?;
        Ok(snapshot)
    }

    fn check_version(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(())
    }

    /// Rebuilds `engine` from this snapshot on the built-in chart
    pub fn restore(&self, engine: &mut JournalEngine) -> Result<RestoreReport, SnapshotError> {
        self.restore_with_chart(engine, StandardChart::definitions())
    }

    /// Rebuilds `engine` from this snapshot on the given chart
    ///
    /// The engine is cleared and its chart and divisions re-seeded before
    /// anything is replayed. Journals replay in number order and keep their
    /// numbers. A journal that fails validation is skipped and reported; the
    /// rest still replay.
    ///
    /// # Errors
    ///
    /// Fails before touching the engine if the version is unsupported or a
    /// counterparty record is invalid. Fails after clearing it if a record
    /// names an unknown account.
    #[instrument(skip(self, engine, definitions), fields(journals = self.journals.len()))]
    pub fn restore_with_chart(
        &self,
        engine: &mut JournalEngine,
        definitions: Vec<AccountDefinition>,
    ) -> Result<RestoreReport, SnapshotError> {
        self.check_version()?;
        for owner in &self.unit_owners {
            owner.check()?;
        }
        for vendor in &self.vendors {
            vendor.check()?;
        }

        engine.reset();
        engine.chart_mut().initialize(definitions);
        engine.divisions_mut().initialize();

        for owner in &self.unit_owners {
            owner.register(engine.chart_mut())?;
        }
        for vendor in &self.vendors {
            vendor.register(engine.chart_mut())?;
        }

        let mut report = RestoreReport {
            unit_owners: self.unit_owners.len(),
            vendors: self.vendors.len(),
            ..Default::default()
        };

        let mut journals: Vec<&SnapshotJournal> = self.journals.iter().collect();
        journals.sort_by(|a, b| (a.number.len(), &a.number).cmp(&(b.number.len(), &b.number)));

        for journal in journals {
            match replay(engine, journal) {
                Ok(()) => report.restored += 1,
                Err(rejection) => {
                    warn!(number = %journal.number, error = %rejection, "journal not restored");
                    report.failures.push(RestoreFailure {
                        number: journal.number.clone(),
                        messages: rejection.messages(),
                    });
                }
            }
        }

        info!(
            restored = report.restored,
            failed = report.failures.len(),
            "snapshot restored"
        );
        Ok(report)
    }
}

/// Creates one journal and steps it to its recorded status
///
/// A journal that fails part way is removed again so a failure leaves no
/// trace.
fn replay(engine: &mut JournalEngine, record: &SnapshotJournal) -> Result<(), Rejection> {
    if let Some(sequence) = record.sequence() {
        engine.skip_numbers_through(sequence.saturating_sub(1));
    }

    let journal = engine.create_journal(record.to_input(), CreateOptions::default())?;
    let mut status = journal.status;
    while status < record.status {
        let step = match status {
            JournalStatus::Draft => engine.submit_journal(journal.id),
            JournalStatus::Submitted => engine.approve_journal(journal.id),
            JournalStatus::Approved | JournalStatus::Posted => engine.post_journal(journal.id),
        };
        match step {
            Ok(advanced) => status = advanced.status,
            Err(rejection) => {
                // still editable: it never reached POSTED
                if let Err(cleanup) = engine.delete_journal(journal.id) {
                    warn!(
                        journal_id = %journal.id,
                        number = %journal.number,
                        errors = ?cleanup.messages(),
                        "partially replayed journal could not be removed"
                    );
                }
                return Err(rejection);
            }
        }
    }
    Ok(())
}
