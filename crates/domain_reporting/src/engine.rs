//! Reporting engine
//!
//! Read-only derivations over a [`JournalEngine`]. Nothing here mutates the
//! ledger, so any number of reports can be taken at any time.

use tracing::debug;

use core_kernel::{DateRange, Money};
use domain_ledger::{Account, AccountType, DivisionCode, JournalEngine};

use crate::detail::{self, DetailKind, DetailLine, DetailSummary};
use crate::error::ReportResult;
use crate::hierarchy::{self, AccountNode};
use crate::statements::{BalanceSheet, IncomeStatement, StatementLine, TrialBalance, TrialBalanceLine};

/// Derives reports from current ledger state
#[derive(Debug, Clone, Copy)]
pub struct ReportingEngine<'a> {
    ledger: &'a JournalEngine,
}

impl<'a> ReportingEngine<'a> {
    pub fn new(ledger: &'a JournalEngine) -> Self {
        Self { ledger }
    }

    /// Trial balance over every non-zero account
    ///
    /// Each balance lands in the column it currently sits on.
    pub fn trial_balance(&self) -> TrialBalance {
        let lines = self
            .ledger
            .chart()
            .list()
            .into_iter()
            .filter(|a| !a.balance().is_zero())
            .map(|account| {
                let amount = account.display_balance();
                let (debit, credit) = if account.is_debit_balance() {
                    (amount, Money::ZERO)
                } else {
                    (Money::ZERO, amount)
                };
                trial_balance_line(account, debit, credit)
            })
            .collect();

        let report = TrialBalance::from_lines(None, lines);
        debug!(
            total_debit = %report.total_debit,
            total_credit = %report.total_credit,
            "trial balance derived"
        );
        report
    }

    /// Revenue and expense over every non-zero account
    pub fn income_statement(&self) -> IncomeStatement {
        let accounts = self.ledger.chart().list();
        income_statement(None, &accounts)
    }

    /// Assets, liabilities and equity over every non-zero account
    pub fn balance_sheet(&self) -> BalanceSheet {
        let accounts = self.ledger.chart().list();
        balance_sheet(None, &accounts)
    }

    /// Trial balance scoped to one division
    ///
    /// Debit-natured types (asset, expense) go in the debit column and the
    /// rest in the credit column, each signed.
    ///
    /// # Errors
    ///
    /// Returns `DivisionNotFound` if the division is not registered
    pub fn division_trial_balance(&self, division: DivisionCode) -> ReportResult<TrialBalance> {
        let lines = self
            .division_accounts(division)?
            .into_iter()
            .filter(|a| !a.balance().is_zero())
            .map(|account| {
                if account.account_type.is_debit_normal() {
                    trial_balance_line(account, account.net_debit(), Money::ZERO)
                } else {
                    trial_balance_line(account, Money::ZERO, account.net_credit())
                }
            })
            .collect();

        Ok(TrialBalance::from_lines(Some(division), lines))
    }

    /// Income statement scoped to one division
    ///
    /// # Errors
    ///
    /// Returns `DivisionNotFound` if the division is not registered
    pub fn division_income_statement(&self, division: DivisionCode) -> ReportResult<IncomeStatement> {
        let accounts = self.division_accounts(division)?;
        Ok(income_statement(Some(division), &accounts))
    }

    /// Balance sheet scoped to one division
    ///
    /// # Errors
    ///
    /// Returns `DivisionNotFound` if the division is not registered
    pub fn division_balance_sheet(&self, division: DivisionCode) -> ReportResult<BalanceSheet> {
        let accounts = self.division_accounts(division)?;
        Ok(balance_sheet(Some(division), &accounts))
    }

    /// Posted revenue lines within `period`
    pub fn income_details(&self, period: &DateRange, division: Option<DivisionCode>) -> Vec<DetailLine> {
        self.details(DetailKind::Income, period, division)
    }

    /// Posted expense lines within `period`
    pub fn expense_details(&self, period: &DateRange, division: Option<DivisionCode>) -> Vec<DetailLine> {
        self.details(DetailKind::Expense, period, division)
    }

    /// Income listing grouped by account and counterparty
    pub fn income_summary(&self, period: &DateRange, division: Option<DivisionCode>) -> Vec<DetailSummary> {
        detail::summarize(&self.income_details(period, division))
    }

    /// Expense listing grouped by account and counterparty
    pub fn expense_summary(&self, period: &DateRange, division: Option<DivisionCode>) -> Vec<DetailSummary> {
        detail::summarize(&self.expense_details(period, division))
    }

    /// The chart as a tree with rolled-up totals
    pub fn account_hierarchy(&self) -> Vec<AccountNode> {
        hierarchy::build(self.ledger.chart())
    }

    /// Accounts visible in a division's view
    ///
    /// A required division also sees the shared accounts.
    fn division_accounts(&self, division: DivisionCode) -> ReportResult<Vec<&'a Account>> {
        let include_shared = self.ledger.divisions().get(division)?.is_required;
        Ok(self
            .ledger
            .chart()
            .list()
            .into_iter()
            .filter(|a| match a.division {
                Some(d) if d == division => true,
                Some(DivisionCode::Shared) => include_shared,
                _ => false,
            })
            .collect())
    }

    fn details(
        &self,
        kind: DetailKind,
        period: &DateRange,
        division: Option<DivisionCode>,
    ) -> Vec<DetailLine> {
        let chart = self.ledger.chart();
        let wanted = match kind {
            DetailKind::Income => AccountType::Revenue,
            DetailKind::Expense => AccountType::Expense,
        };

        let mut lines: Vec<DetailLine> = Vec::new();
        for journal in self.ledger.posted_journals().filter(|j| period.contains(j.date)) {
            for detail in &journal.details {
                let Ok(account) = chart.get(&detail.account_code) else {
                    continue;
                };
                if account.account_type != wanted {
                    continue;
                }
                if division.is_some_and(|d| account.division != Some(d)) {
                    continue;
                }

                let amount = match kind {
                    DetailKind::Income => detail.credit_amount - detail.debit_amount,
                    DetailKind::Expense => detail.debit_amount - detail.credit_amount,
                };
                if !amount.is_positive() {
                    continue;
                }

                let auxiliary_name = detail
                    .auxiliary_code
                    .as_deref()
                    .and_then(|code| auxiliary_name(self.ledger, account, code));

                lines.push(DetailLine {
                    date: journal.date,
                    journal_id: journal.id,
                    journal_number: journal.number.clone(),
                    description: detail
                        .description
                        .clone()
                        .unwrap_or_else(|| journal.description.clone()),
                    account_code: account.code.clone(),
                    account_name: account.name.clone(),
                    auxiliary_code: detail.auxiliary_code.clone(),
                    auxiliary_name,
                    amount,
                });
            }
        }

        lines.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.journal_number.cmp(&b.journal_number)));
        lines
    }
}

/// Counterparty name for a line, from its own account or any sub-ledger
/// carrying the same code (revenue lines reference the receivable's owner)
fn auxiliary_name(ledger: &JournalEngine, account: &Account, code: &str) -> Option<String> {
    account
        .auxiliary_ledger(code)
        .or_else(|| {
            ledger
                .chart()
                .list()
                .into_iter()
                .find_map(|a| a.auxiliary_ledger(code))
        })
        .map(|l| l.name.clone())
}

fn trial_balance_line(account: &Account, debit: Money, credit: Money) -> TrialBalanceLine {
    TrialBalanceLine {
        code: account.code.clone(),
        name: account.name.clone(),
        account_type: account.account_type,
        debit,
        credit,
    }
}

fn income_statement(division: Option<DivisionCode>, accounts: &[&Account]) -> IncomeStatement {
    let mut revenue = Vec::new();
    let mut expenses = Vec::new();
    for account in accounts.iter().filter(|a| !a.balance().is_zero()) {
        match account.account_type {
            AccountType::Revenue => revenue.push(StatementLine::new(account, account.net_credit())),
            AccountType::Expense => expenses.push(StatementLine::new(account, account.net_debit())),
            _ => {}
        }
    }
    IncomeStatement::from_lines(division, revenue, expenses)
}

fn balance_sheet(division: Option<DivisionCode>, accounts: &[&Account]) -> BalanceSheet {
    let mut assets = Vec::new();
    let mut liabilities = Vec::new();
    let mut equity = Vec::new();
    for account in accounts.iter().filter(|a| !a.balance().is_zero()) {
        match account.account_type {
            AccountType::Asset => assets.push(StatementLine::new(account, account.net_debit())),
            AccountType::Liability => liabilities.push(StatementLine::new(account, account.net_credit())),
            AccountType::Equity => equity.push(StatementLine::new(account, account.net_credit())),
            _ => {}
        }
    }
    let net_income = income_statement(division, accounts).net_income;
    BalanceSheet::from_lines(division, assets, liabilities, equity, net_income)
}
