//! Report shapes
//!
//! Every report is a plain value derived from ledger state at the moment it
//! was requested. They serialize to camelCase JSON.

use serde::Serialize;

use core_kernel::{Money, BALANCE_EPSILON};
use domain_ledger::{Account, AccountType, DivisionCode};

/// Code of the synthetic balance-sheet line carrying current net income
pub const NET_INCOME_LINE_CODE: &str = "NET_INCOME";

/// One account in a trial balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalanceLine {
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub debit: Money,
    pub credit: Money,
}

/// Debit and credit columns over non-zero accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub division: Option<DivisionCode>,
    pub lines: Vec<TrialBalanceLine>,
    pub total_debit: Money,
    pub total_credit: Money,
    pub is_balanced: bool,
}

impl TrialBalance {
    pub(crate) fn from_lines(division: Option<DivisionCode>, lines: Vec<TrialBalanceLine>) -> Self {
        let total_debit: Money = lines.iter().map(|l| l.debit).sum();
        let total_credit: Money = lines.iter().map(|l| l.credit).sum();
        Self {
            division,
            is_balanced: total_debit.approx_eq(&total_credit, BALANCE_EPSILON),
            lines,
            total_debit,
            total_credit,
        }
    }

    /// Debits minus credits
    pub fn difference(&self) -> Money {
        self.total_debit - self.total_credit
    }
}

/// One amount on a statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementLine {
    pub code: String,
    pub name: String,
    pub amount: Money,
}

impl StatementLine {
    pub(crate) fn new(account: &Account, amount: Money) -> Self {
        Self {
            code: account.code.clone(),
            name: account.name.clone(),
            amount,
        }
    }
}

/// Revenue against expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStatement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub division: Option<DivisionCode>,
    pub revenue: Vec<StatementLine>,
    pub expenses: Vec<StatementLine>,
    pub total_revenue: Money,
    pub total_expense: Money,
    pub net_income: Money,
}

impl IncomeStatement {
    pub(crate) fn from_lines(
        division: Option<DivisionCode>,
        revenue: Vec<StatementLine>,
        expenses: Vec<StatementLine>,
    ) -> Self {
        let total_revenue: Money = revenue.iter().map(|l| l.amount).sum();
        let total_expense: Money = expenses.iter().map(|l| l.amount).sum();
        Self {
            division,
            revenue,
            expenses,
            total_revenue,
            total_expense,
            net_income: total_revenue - total_expense,
        }
    }
}

/// Assets against liabilities and equity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub division: Option<DivisionCode>,
    pub assets: Vec<StatementLine>,
    pub liabilities: Vec<StatementLine>,
    /// Equity accounts followed by the current net income line
    pub equity: Vec<StatementLine>,
    pub total_assets: Money,
    pub total_liabilities: Money,
    pub total_equity: Money,
    pub net_income: Money,
    pub is_balanced: bool,
}

impl BalanceSheet {
    pub(crate) fn from_lines(
        division: Option<DivisionCode>,
        assets: Vec<StatementLine>,
        liabilities: Vec<StatementLine>,
        mut equity: Vec<StatementLine>,
        net_income: Money,
    ) -> Self {
        equity.push(StatementLine {
            code: NET_INCOME_LINE_CODE.to_string(),
            name: "Current period net income".to_string(),
            amount: net_income,
        });

        let total_assets: Money = assets.iter().map(|l| l.amount).sum();
        let total_liabilities: Money = liabilities.iter().map(|l| l.amount).sum();
        let total_equity: Money = equity.iter().map(|l| l.amount).sum();

        Self {
            division,
            is_balanced: total_assets.approx_eq(&(total_liabilities + total_equity), BALANCE_EPSILON),
            assets,
            liabilities,
            equity,
            total_assets,
            total_liabilities,
            total_equity,
            net_income,
        }
    }
}
