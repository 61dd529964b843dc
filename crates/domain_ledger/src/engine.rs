//! Journal engine
//!
//! The engine owns the chart of accounts, the division registry and every
//! journal. It is the only component that changes balances: every posting
//! goes through [`JournalEngine::create_journal`] with auto-post, or through
//! the submit/approve/post lifecycle.
//!
//! # Atomicity
//!
//! Validation runs over the current state before anything is mutated. A
//! rejected operation leaves balances, sub-ledgers and the journal list
//! exactly as they were.

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, instrument, warn};

use core_kernel::{JournalId, Money};
use crate::chart::ChartOfAccounts;
use crate::division::DivisionRegistry;
use crate::error::{LedgerError, LedgerResult, Rejection};
use crate::journal::{CreateOptions, Journal, JournalDetail, JournalInput, JournalStatus};
use crate::standard_chart::StandardChart;
use crate::validation;

/// Width of the zero-padded display number
pub const JOURNAL_NUMBER_WIDTH: usize = 6;

/// Validates, records and posts journals
#[derive(Debug, Clone)]
pub struct JournalEngine {
    chart: ChartOfAccounts,
    divisions: DivisionRegistry,
    journals: Vec<Journal>,
    sequence: u64,
}

impl JournalEngine {
    /// Creates an engine over an existing chart and division registry
    pub fn new(chart: ChartOfAccounts, divisions: DivisionRegistry) -> Self {
        Self {
            chart,
            divisions,
            journals: Vec::new(),
            sequence: 0,
        }
    }

    /// Creates an engine with the built-in condominium chart and divisions
    pub fn with_standard_chart() -> Self {
        Self::new(
            ChartOfAccounts::from_definitions(StandardChart::definitions()),
            DivisionRegistry::with_defaults(),
        )
    }

    pub fn chart(&self) -> &ChartOfAccounts {
        &self.chart
    }

    /// Mutable chart access for definitions, activation and sub-ledgers
    ///
    /// Balances stay out of reach; they only move through journals.
    pub fn chart_mut(&mut self) -> &mut ChartOfAccounts {
        &mut self.chart
    }

    pub fn divisions(&self) -> &DivisionRegistry {
        &self.divisions
    }

    pub fn divisions_mut(&mut self) -> &mut DivisionRegistry {
        &mut self.divisions
    }

    /// Current signed balance of an account
    pub fn account_balance(&self, code: &str) -> LedgerResult<Money> {
        Ok(self.chart.get(code)?.balance())
    }

    /// Creates a journal
    ///
    /// The journal is stored as DRAFT, or validated and posted in one step
    /// when `options.auto_post` is set.
    ///
    /// # Arguments
    ///
    /// * `input` - The journal-creation contract
    /// * `options` - Creation options
    ///
    /// # Errors
    ///
    /// Returns a rejection listing every validation failure. Nothing is
    /// recorded or posted in that case.
    #[instrument(skip(self, input), fields(description = %input.description, lines = input.details.len(), auto_post = options.auto_post))]
    pub fn create_journal(
        &mut self,
        input: JournalInput,
        options: CreateOptions,
    ) -> Result<Journal, Rejection> {
        let details = self.validated(&input)?;
        let date = input.date.ok_or(LedgerError::MissingDate)?;

        if options.auto_post {
            self.check_postable(&details)?;
        }

        let sequence = self.sequence + 1;
        let now = Utc::now();
        let mut journal = Journal {
            id: JournalId::new_v7(),
            number: format!("{:0width$}", sequence, width = JOURNAL_NUMBER_WIDTH),
            date,
            description: input.description,
            division: input.division,
            reference: input.reference,
            details,
            status: JournalStatus::Draft,
            created_at: now,
            updated_at: now,
            posted_at: None,
        };

        if options.auto_post {
            self.apply_posting(&journal)?;
            journal.status = JournalStatus::Posted;
            journal.posted_at = Some(now);
        }

        self.sequence = sequence;
        info!(
            journal_id = %journal.id,
            number = %journal.number,
            status = %journal.status,
            total = %journal.debit_total(),
            "journal accepted"
        );
        self.journals.push(journal.clone());
        Ok(journal)
    }

    /// Checks an input against every validation step without recording it
    pub fn validate(&self, input: &JournalInput) -> Result<(), Rejection> {
        validation::validate_input(input, &self.chart, &self.divisions).map(|_| ())
    }

    /// Checks only the cross-division transfer rules for an input
    ///
    /// Lines referencing unknown accounts are ignored here; structural
    /// validation reports them.
    pub fn validate_division_accounting(&self, input: &JournalInput) -> Result<(), Rejection> {
        let details: Vec<JournalDetail> = input.details.iter().map(JournalDetail::from_input).collect();
        let errors = validation::check_divisions(&details, &self.chart, &self.divisions);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Rejection::new(errors))
        }
    }

    /// Moves a DRAFT journal to SUBMITTED
    #[instrument(skip(self))]
    pub fn submit_journal(&mut self, id: JournalId) -> Result<Journal, Rejection> {
        self.advance(id, JournalStatus::Submitted)
    }

    /// Moves a SUBMITTED journal to APPROVED
    #[instrument(skip(self))]
    pub fn approve_journal(&mut self, id: JournalId) -> Result<Journal, Rejection> {
        self.advance(id, JournalStatus::Approved)
    }

    /// Posts an APPROVED journal, applying it to balances
    #[instrument(skip(self))]
    pub fn post_journal(&mut self, id: JournalId) -> Result<Journal, Rejection> {
        self.advance(id, JournalStatus::Posted)
    }

    /// Replaces the content of a journal that is not yet posted
    ///
    /// The journal keeps its id, number and status. The new content goes
    /// through the full validation pipeline.
    ///
    /// # Errors
    ///
    /// - `JournalNotFound` if the id is unknown
    /// - `PostedJournalImmutable` if the journal is posted
    /// - Any validation error of the new content
    #[instrument(skip(self, input))]
    pub fn update_journal(&mut self, id: JournalId, input: JournalInput) -> Result<Journal, Rejection> {
        let index = self.editable_index(id)?;
        let details = self.validated(&input)?;
        let date = input.date.ok_or(LedgerError::MissingDate)?;

        let journal = &mut self.journals[index];
        journal.date = date;
        journal.description = input.description;
        journal.division = input.division;
        journal.reference = input.reference;
        journal.details = details;
        journal.updated_at = Utc::now();

        debug!(journal_id = %id, "journal updated");
        Ok(journal.clone())
    }

    /// Deletes a journal that is not yet posted and returns it
    ///
    /// Its number is not reused.
    #[instrument(skip(self))]
    pub fn delete_journal(&mut self, id: JournalId) -> Result<Journal, Rejection> {
        let index = self.editable_index(id)?;
        let journal = self.journals.remove(index);
        info!(journal_id = %id, number = %journal.number, "journal deleted");
        Ok(journal)
    }

    /// Posts a new journal undoing a posted one
    ///
    /// Every line's debit and credit are swapped. The reversal references
    /// the original's number and is validated like any other journal.
    ///
    /// # Errors
    ///
    /// - `JournalNotFound` if the id is unknown
    /// - `JournalNotPosted` if the original has no balance effect to undo
    #[instrument(skip(self, reason))]
    pub fn reverse_journal(
        &mut self,
        id: JournalId,
        date: NaiveDate,
        reason: &str,
    ) -> Result<Journal, Rejection> {
        let original = self.get_journal(id).map_err(Rejection::from)?;
        if !original.is_posted() {
            return Err(self.reject(LedgerError::JournalNotPosted(id)));
        }

        let mut input = JournalInput::new(date, reason).with_reference(original.number.clone());
        input.division = original.division;
        input.details = original
            .details
            .iter()
            .map(|detail| {
                let mut line = detail.to_input();
                std::mem::swap(&mut line.debit_amount, &mut line.credit_amount);
                line
            })
            .collect();

        self.create_journal(input, CreateOptions::auto_post())
    }

    /// Looks up a journal
    pub fn get_journal(&self, id: JournalId) -> LedgerResult<&Journal> {
        self.journals
            .iter()
            .find(|j| j.id == id)
            .ok_or(LedgerError::JournalNotFound(id))
    }

    /// Looks up a journal by display number
    pub fn journal_by_number(&self, number: &str) -> Option<&Journal> {
        self.journals.iter().find(|j| j.number == number)
    }

    /// All journals in creation order
    pub fn journals(&self) -> &[Journal] {
        &self.journals
    }

    pub fn journals_with_status(&self, status: JournalStatus) -> Vec<&Journal> {
        self.journals.iter().filter(|j| j.status == status).collect()
    }

    /// Iterates posted journals in creation order
    pub fn posted_journals(&self) -> impl Iterator<Item = &Journal> {
        self.journals.iter().filter(|j| j.is_posted())
    }

    /// Advances numbering so the next journal is numbered after `last`
    ///
    /// Never moves the counter backwards. Used when replaying journals that
    /// already carry numbers.
    pub fn skip_numbers_through(&mut self, last: u64) {
        self.sequence = self.sequence.max(last);
    }

    /// Clears journals, numbering, balances and sub-ledgers
    ///
    /// Account and division definitions are kept.
    pub fn reset(&mut self) {
        self.journals.clear();
        self.sequence = 0;
        self.chart.reset_balances();
        info!("ledger reset");
    }

    fn validated(&self, input: &JournalInput) -> Result<Vec<JournalDetail>, Rejection> {
        validation::validate_input(input, &self.chart, &self.divisions).map_err(|rejection| {
            warn!(errors = ?rejection.messages(), "journal rejected");
            rejection
        })
    }

    fn reject(&self, error: LedgerError) -> Rejection {
        warn!(error = %error, "journal operation rejected");
        Rejection::from(error)
    }

    fn index_of(&self, id: JournalId) -> Result<usize, Rejection> {
        self.journals
            .iter()
            .position(|j| j.id == id)
            .ok_or_else(|| self.reject(LedgerError::JournalNotFound(id)))
    }

    fn editable_index(&self, id: JournalId) -> Result<usize, Rejection> {
        let index = self.index_of(id)?;
        if !self.journals[index].status.is_editable() {
            return Err(self.reject(LedgerError::PostedJournalImmutable(id)));
        }
        Ok(index)
    }

    fn advance(&mut self, id: JournalId, target: JournalStatus) -> Result<Journal, Rejection> {
        let index = self.index_of(id)?;
        let from = self.journals[index].status;
        if from.next() != Some(target) {
            return Err(self.reject(LedgerError::InvalidStatusTransition { from, to: target }));
        }

        let now = Utc::now();
        if target == JournalStatus::Posted {
            let journal = self.journals[index].clone();
            self.check_postable(&journal.details)?;
            self.apply_posting(&journal)?;
            self.journals[index].posted_at = Some(now);
            info!(journal_id = %id, number = %journal.number, "journal posted");
        }

        let journal = &mut self.journals[index];
        journal.status = target;
        journal.updated_at = now;
        debug!(journal_id = %id, %from, to = %target, "journal status changed");
        Ok(journal.clone())
    }

    /// Confirms every account and sub-ledger a posting touches still exists
    fn check_postable(&self, details: &[JournalDetail]) -> Result<(), Rejection> {
        let mut errors = Vec::new();
        for detail in details {
            match self.chart.get(&detail.account_code) {
                Ok(account) => {
                    if let Some(auxiliary_code) = &detail.auxiliary_code {
                        if account.is_auxiliary_bearing()
                            && account.auxiliary_ledger(auxiliary_code).is_none()
                        {
                            errors.push(LedgerError::AuxiliaryLedgerNotFound {
                                account_code: detail.account_code.clone(),
                                auxiliary_code: auxiliary_code.clone(),
                            });
                        }
                    }
                }
                Err(e) => errors.push(e),
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Rejection::new(errors))
        }
    }

    /// Applies a journal's lines to balances and sub-ledgers
    ///
    /// Lines are posted to a copy of the chart that replaces the live one
    /// only when every line succeeded.
    fn apply_posting(&mut self, journal: &Journal) -> Result<(), Rejection> {
        let mut staged = self.chart.clone();
        for detail in &journal.details {
            let amount = detail.amount();
            let is_debit = detail.is_debit();
            staged.post(&detail.account_code, amount, is_debit)?;

            if let Some(auxiliary_code) = &detail.auxiliary_code {
                if staged.get(&detail.account_code)?.is_auxiliary_bearing() {
                    staged.record_auxiliary(
                        &detail.account_code,
                        auxiliary_code,
                        journal.id,
                        journal.date,
                        amount,
                        is_debit,
                        detail.description.clone().or_else(|| Some(journal.description.clone())),
                    )?;
                }
            }
        }
        self.chart = staged;
        Ok(())
    }
}

impl Default for JournalEngine {
    fn default() -> Self {
        Self::with_standard_chart()
    }
}
