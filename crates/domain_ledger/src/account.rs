//! Account types for the chart of accounts
//!
//! This module defines the account node stored in the chart, the flat
//! definition used to build it, and the normal-balance sign rule.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use core_kernel::Money;
use crate::auxiliary::AuxiliaryLedger;
use crate::division::DivisionCode;

/// Types of accounts in the chart of accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    /// Asset accounts (debit normal balance)
    Asset,
    /// Liability accounts (credit normal balance)
    Liability,
    /// Equity accounts (credit normal balance)
    Equity,
    /// Revenue accounts (credit normal balance)
    Revenue,
    /// Expense accounts (debit normal balance)
    Expense,
}

impl AccountType {
    /// Returns true if this account type has a debit normal balance
    pub fn is_debit_normal(&self) -> bool {
        matches!(self, AccountType::Asset | AccountType::Expense)
    }

    /// The conventional normal balance for this type
    pub fn normal_balance(&self) -> NormalBalance {
        if self.is_debit_normal() {
            NormalBalance::Debit
        } else {
            NormalBalance::Credit
        }
    }

    /// Returns true for balance sheet types
    pub fn is_balance_sheet(&self) -> bool {
        matches!(
            self,
            AccountType::Asset | AccountType::Liability | AccountType::Equity
        )
    }

    /// Returns true for income statement types
    pub fn is_income_statement(&self) -> bool {
        matches!(self, AccountType::Revenue | AccountType::Expense)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Asset => "ASSET",
            AccountType::Liability => "LIABILITY",
            AccountType::Equity => "EQUITY",
            AccountType::Revenue => "REVENUE",
            AccountType::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ASSET" => Ok(AccountType::Asset),
            "LIABILITY" => Ok(AccountType::Liability),
            "EQUITY" => Ok(AccountType::Equity),
            "REVENUE" => Ok(AccountType::Revenue),
            "EXPENSE" => Ok(AccountType::Expense),
            _ => Err(format!("Invalid account type: {}", s)),
        }
    }
}

/// The side on which an account accumulates value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NormalBalance {
    Debit,
    Credit,
}

impl NormalBalance {
    /// Signed effect on a stored balance of posting `amount` to one side.
    ///
    /// Posting on the normal side increases the balance; posting on the
    /// opposite side decreases it.
    pub fn signed_change(&self, amount: Money, is_debit: bool) -> Money {
        match (self, is_debit) {
            (NormalBalance::Debit, true) | (NormalBalance::Credit, false) => amount,
            (NormalBalance::Debit, false) | (NormalBalance::Credit, true) => -amount,
        }
    }
}

/// Kind of counterparty tracked by an account's sub-ledgers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuxiliaryKind {
    /// Per unit-owner sub-ledger (receivables, advances)
    UnitOwner,
    /// Per vendor sub-ledger (payables)
    Vendor,
}

fn default_true() -> bool {
    true
}

/// Flat account definition used to build or update the chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDefinition {
    /// Account code (e.g., "1120")
    pub code: String,
    /// Account name
    pub name: String,
    /// Account type
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Normal balance; defaults to the type's convention
    #[serde(default)]
    pub normal_balance: Option<NormalBalance>,
    /// Division the account belongs to
    #[serde(default)]
    pub division: Option<DivisionCode>,
    /// Parent account code
    #[serde(default)]
    pub parent_code: Option<String>,
    /// Whether journal lines may reference this account
    #[serde(default = "default_true")]
    pub postable: bool,
    /// Counterparty kind for sub-ledgers
    #[serde(default)]
    pub auxiliary: Option<AuxiliaryKind>,
}

impl AccountDefinition {
    /// Creates a postable definition with the type's normal balance
    pub fn new(code: impl Into<String>, name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            account_type,
            normal_balance: None,
            division: None,
            parent_code: None,
            postable: true,
            auxiliary: None,
        }
    }

    /// Sets the division
    pub fn with_division(mut self, division: DivisionCode) -> Self {
        self.division = Some(division);
        self
    }

    /// Sets the parent account code
    pub fn with_parent(mut self, parent_code: impl Into<String>) -> Self {
        self.parent_code = Some(parent_code.into());
        self
    }

    /// Overrides the normal balance (e.g. for contra accounts)
    pub fn with_normal_balance(mut self, normal_balance: NormalBalance) -> Self {
        self.normal_balance = Some(normal_balance);
        self
    }

    /// Marks the account as auxiliary-bearing
    pub fn with_auxiliary(mut self, kind: AuxiliaryKind) -> Self {
        self.auxiliary = Some(kind);
        self
    }

    /// Marks the account as a non-postable header
    pub fn header(mut self) -> Self {
        self.postable = false;
        self
    }

    /// The effective normal balance
    pub fn effective_normal_balance(&self) -> NormalBalance {
        self.normal_balance
            .unwrap_or_else(|| self.account_type.normal_balance())
    }
}

/// An account in the chart of accounts
///
/// Parent and children are stored as codes into the chart's arena, never as
/// references. The balance is signed relative to the normal balance: a
/// positive value sits on the normal side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Account code
    pub code: String,
    /// Account name
    pub name: String,
    /// Account type
    pub account_type: AccountType,
    /// Normal balance side
    pub normal_balance: NormalBalance,
    /// Division tag
    pub division: Option<DivisionCode>,
    /// Whether the account accepts new postings
    pub is_active: bool,
    /// Whether journal lines may reference this account
    pub is_postable: bool,
    /// Counterparty kind for sub-ledgers
    pub auxiliary_kind: Option<AuxiliaryKind>,
    parent: Option<String>,
    children: Vec<String>,
    balance: Money,
    auxiliary_ledgers: BTreeMap<String, AuxiliaryLedger>,
}

impl Account {
    /// Creates a detached account with a zero balance
    pub fn from_definition(definition: &AccountDefinition) -> Self {
        Self {
            code: definition.code.clone(),
            name: definition.name.clone(),
            account_type: definition.account_type,
            normal_balance: definition.effective_normal_balance(),
            division: definition.division,
            is_active: true,
            is_postable: definition.postable,
            auxiliary_kind: definition.auxiliary,
            parent: None,
            children: Vec::new(),
            balance: Money::ZERO,
            auxiliary_ledgers: BTreeMap::new(),
        }
    }

    /// Parent account code
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Child account codes, sorted
    pub fn children(&self) -> &[String] {
        &self.children
    }

    /// Signed running balance
    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Balance magnitude for display
    pub fn display_balance(&self) -> Money {
        self.balance.abs()
    }

    /// Whether the balance currently sits on the debit side
    pub fn is_debit_balance(&self) -> bool {
        match self.normal_balance {
            NormalBalance::Debit => !self.balance.is_negative(),
            NormalBalance::Credit => self.balance.is_negative(),
        }
    }

    /// Balance expressed as net debit (debits minus credits)
    pub fn net_debit(&self) -> Money {
        match self.normal_balance {
            NormalBalance::Debit => self.balance,
            NormalBalance::Credit => -self.balance,
        }
    }

    /// Balance expressed as net credit (credits minus debits)
    pub fn net_credit(&self) -> Money {
        -self.net_debit()
    }

    /// Whether the account carries counterparty sub-ledgers
    pub fn is_auxiliary_bearing(&self) -> bool {
        self.auxiliary_kind.is_some() || !self.auxiliary_ledgers.is_empty()
    }

    /// Looks up a sub-ledger by auxiliary code
    pub fn auxiliary_ledger(&self, auxiliary_code: &str) -> Option<&AuxiliaryLedger> {
        self.auxiliary_ledgers.get(auxiliary_code)
    }

    /// All sub-ledgers, ordered by auxiliary code
    pub fn auxiliary_ledgers(&self) -> impl Iterator<Item = &AuxiliaryLedger> {
        self.auxiliary_ledgers.values()
    }

    pub(crate) fn set_parent(&mut self, parent: Option<String>) {
        self.parent = parent;
    }

    pub(crate) fn add_child(&mut self, code: &str) {
        if let Err(pos) = self.children.binary_search_by(|c| c.as_str().cmp(code)) {
            self.children.insert(pos, code.to_string());
        }
    }

    pub(crate) fn auxiliary_ledger_mut(&mut self, auxiliary_code: &str) -> Option<&mut AuxiliaryLedger> {
        self.auxiliary_ledgers.get_mut(auxiliary_code)
    }

    pub(crate) fn insert_auxiliary_ledger(&mut self, ledger: AuxiliaryLedger) -> &AuxiliaryLedger {
        let code = ledger.code.clone();
        self.auxiliary_ledgers.entry(code).or_insert(ledger)
    }

    /// Applies one posting using the normal-balance sign rule
    pub(crate) fn apply(&mut self, amount: Money, is_debit: bool) -> Result<Money, core_kernel::MoneyError> {
        let change = self.normal_balance.signed_change(amount, is_debit);
        self.balance = self.balance.checked_add(&change)?;
        Ok(self.balance)
    }

    pub(crate) fn reset(&mut self) {
        self.balance = Money::ZERO;
        self.auxiliary_ledgers.clear();
    }
}
