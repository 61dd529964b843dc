//! Period closing
//!
//! At period end each required division's revenue and expense accounts are
//! zeroed into that division's retained-surplus account. Divisions close
//! independently: a failure in one is reported and the rest still close.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, instrument, warn};

use core_kernel::{JournalId, Money};
use crate::account::AccountType;
use crate::division::DivisionCode;
use crate::engine::JournalEngine;
use crate::error::{LedgerError, Rejection};
use crate::journal::{CreateOptions, JournalDetailInput, JournalInput};
use crate::standard_chart::StandardChart;

/// Resolves the retained-surplus account of a division
pub trait SurplusAccountResolver {
    /// Account code receiving the division's net income, if it has one
    fn surplus_account(&self, division: DivisionCode) -> Option<String>;
}

/// Outcome of closing one division
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosingResult {
    pub division: DivisionCode,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal_id: Option<JournalId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal_number: Option<String>,
    /// Revenue minus expense closed out
    pub net_income: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ClosingResult {
    fn nothing_to_close(division: DivisionCode) -> Self {
        Self {
            division,
            success: true,
            journal_id: None,
            journal_number: None,
            net_income: Money::ZERO,
            error: None,
        }
    }

    fn failed(division: DivisionCode, net_income: Money, error: String) -> Self {
        Self {
            division,
            success: false,
            journal_id: None,
            journal_number: None,
            net_income,
            error: Some(error),
        }
    }
}

/// Outcome of a period close across divisions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosingReport {
    pub date: NaiveDate,
    pub results: Vec<ClosingResult>,
}

impl ClosingReport {
    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|r| r.success)
    }

    /// Ids of the closing journals that were posted
    pub fn closed_journals(&self) -> Vec<JournalId> {
        self.results.iter().filter_map(|r| r.journal_id).collect()
    }

    pub fn failures(&self) -> Vec<&ClosingResult> {
        self.results.iter().filter(|r| !r.success).collect()
    }
}

/// Closing entry for one division, before it is recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosingEntry {
    pub input: JournalInput,
    pub net_income: Money,
}

/// Generates closing entries
#[derive(Debug, Clone, Default)]
pub struct ClosingEngine<R = StandardChart> {
    resolver: R,
}

impl ClosingEngine<StandardChart> {
    /// Closing against the built-in chart's surplus accounts
    pub fn standard() -> Self {
        Self::new(StandardChart)
    }
}

impl<R: SurplusAccountResolver> ClosingEngine<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    /// Closes every required division
    #[instrument(skip(self, engine))]
    pub fn close_period(&self, engine: &mut JournalEngine, closing_date: NaiveDate) -> ClosingReport {
        let divisions: Vec<DivisionCode> = engine.divisions().required().iter().map(|d| d.code).collect();

        let results: Vec<ClosingResult> = divisions
            .into_iter()
            .map(|division| self.close_division(engine, division, closing_date))
            .collect();

        let report = ClosingReport {
            date: closing_date,
            results,
        };
        info!(
            divisions = report.results.len(),
            journals = report.closed_journals().len(),
            all_succeeded = report.all_succeeded(),
            "period closed"
        );
        report
    }

    /// Closes one division
    ///
    /// A division with no revenue or expense balances succeeds without a
    /// journal.
    #[instrument(skip(self, engine))]
    pub fn close_division(
        &self,
        engine: &mut JournalEngine,
        division: DivisionCode,
        closing_date: NaiveDate,
    ) -> ClosingResult {
        let entry = match self.build_entry(engine, division, closing_date) {
            Ok(Some(entry)) => entry,
            Ok(None) => return ClosingResult::nothing_to_close(division),
            Err(e) => {
                warn!(%division, error = %e, "division closing failed");
                return ClosingResult::failed(division, Money::ZERO, e.to_string());
            }
        };

        match engine.create_journal(entry.input, CreateOptions::auto_post()) {
            Ok(journal) => ClosingResult {
                division,
                success: true,
                journal_id: Some(journal.id),
                journal_number: Some(journal.number),
                net_income: entry.net_income,
                error: None,
            },
            Err(rejection) => {
                warn!(%division, error = %rejection, "division closing failed");
                ClosingResult::failed(division, entry.net_income, rejection.to_string())
            }
        }
    }

    /// Builds the closing entry for a division without recording it
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the division has no surplus account
    pub fn build_entry(
        &self,
        engine: &JournalEngine,
        division: DivisionCode,
        closing_date: NaiveDate,
    ) -> Result<Option<ClosingEntry>, Rejection> {
        let accounts: Vec<_> = engine
            .chart()
            .by_division(division)
            .into_iter()
            .filter(|a| a.account_type.is_income_statement() && !a.balance().is_zero())
            .collect();

        if accounts.is_empty() {
            return Ok(None);
        }

        let surplus = self
            .resolver
            .surplus_account(division)
            .ok_or_else(|| LedgerError::AccountNotFound(format!("surplus account for {division}")))?;
        engine.chart().get(&surplus)?;

        let mut input = JournalInput::new(closing_date, format!("Closing entry - {division}"))
            .with_division(division);
        let mut net_income = Money::ZERO;

        for account in accounts {
            let net_debit = account.net_debit();
            if net_debit.is_positive() {
                input = input.credit(account.code.clone(), net_debit);
            } else {
                input = input.debit(account.code.clone(), -net_debit);
            }
            if account.account_type == AccountType::Revenue {
                net_income += account.net_credit();
            } else {
                net_income -= net_debit;
            }
        }

        if net_income.is_positive() {
            input = input.line(JournalDetailInput::credit(surplus, net_income).with_description("Net surplus"));
        } else if net_income.is_negative() {
            input = input.line(JournalDetailInput::debit(surplus, -net_income).with_description("Net deficit"));
        }

        Ok(Some(ClosingEntry { input, net_income }))
    }
}
