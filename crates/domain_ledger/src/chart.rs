//! Chart of accounts
//!
//! The chart is an arena of accounts keyed by code. Hierarchy edges are
//! stored as codes on each account, so the tree never holds references into
//! itself. Balances change only through `post`, which is crate-private and
//! called by the journal engine after validation.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use tracing::{debug, warn};

use core_kernel::{JournalId, Money};
use crate::account::{Account, AccountDefinition, AccountType};
use crate::auxiliary::AuxiliaryLedger;
use crate::division::DivisionCode;
use crate::error::{LedgerError, LedgerResult};

/// The chart of accounts
#[derive(Debug, Clone, Default)]
pub struct ChartOfAccounts {
    accounts: BTreeMap<String, Account>,
}

impl ChartOfAccounts {
    /// Creates an empty chart
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a chart from flat definitions
    pub fn from_definitions(definitions: impl IntoIterator<Item = AccountDefinition>) -> Self {
        let mut chart = Self::new();
        chart.initialize(definitions);
        chart
    }

    /// Replaces the whole chart with `definitions`
    ///
    /// Parent links are resolved by code after every account is inserted. A
    /// parent code that does not resolve, or that would close a cycle, leaves
    /// the account at the root.
    pub fn initialize(&mut self, definitions: impl IntoIterator<Item = AccountDefinition>) {
        self.accounts.clear();

        let definitions: Vec<AccountDefinition> = definitions.into_iter().collect();
        for definition in &definitions {
            if self.accounts.contains_key(&definition.code) {
                warn!(code = %definition.code, "duplicate account definition replaces earlier one");
            }
            self.accounts
                .insert(definition.code.clone(), Account::from_definition(definition));
        }

        for definition in &definitions {
            if let Some(parent_code) = &definition.parent_code {
                self.attach(&definition.code, parent_code);
            }
        }

        debug!(accounts = self.accounts.len(), "chart of accounts initialized");
    }

    /// Inserts a new account or updates the mutable fields of an existing one
    ///
    /// Updating never reparents the account or its children.
    pub fn add_or_update(&mut self, definition: AccountDefinition) -> LedgerResult<&Account> {
        if let Some(account) = self.accounts.get_mut(&definition.code) {
            let normal_balance = definition.effective_normal_balance();
            if normal_balance != account.normal_balance && !account.balance().is_zero() {
                return Err(LedgerError::NormalBalanceLocked(definition.code));
            }
            account.name = definition.name;
            account.account_type = definition.account_type;
            account.normal_balance = normal_balance;
            account.division = definition.division;
            account.is_postable = definition.postable;
            account.auxiliary_kind = definition.auxiliary;
        } else {
            let code = definition.code.clone();
            self.accounts.insert(code.clone(), Account::from_definition(&definition));
            if let Some(parent_code) = &definition.parent_code {
                self.attach(&code, parent_code);
            }
        }

        self.get(&definition.code)
    }

    fn attach(&mut self, code: &str, parent_code: &str) {
        if code == parent_code || !self.accounts.contains_key(parent_code) {
            debug!(code, parent_code, "parent not resolved, account kept at root");
            return;
        }
        if self.ancestor_codes(parent_code).iter().any(|c| c == code) {
            warn!(code, parent_code, "parent link would form a cycle, account kept at root");
            return;
        }

        if let Some(account) = self.accounts.get_mut(code) {
            account.set_parent(Some(parent_code.to_string()));
        }
        if let Some(parent) = self.accounts.get_mut(parent_code) {
            parent.add_child(code);
        }
    }

    /// Looks up an account
    pub fn get(&self, code: &str) -> LedgerResult<&Account> {
        self.accounts
            .get(code)
            .ok_or_else(|| LedgerError::AccountNotFound(code.to_string()))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.accounts.contains_key(code)
    }

    /// All accounts sorted by code
    pub fn list(&self) -> Vec<&Account> {
        self.accounts.values().collect()
    }

    /// Accounts of one type, sorted by code
    pub fn by_type(&self, account_type: AccountType) -> Vec<&Account> {
        self.accounts
            .values()
            .filter(|a| a.account_type == account_type)
            .collect()
    }

    /// Accounts tagged with one division, sorted by code
    pub fn by_division(&self, division: DivisionCode) -> Vec<&Account> {
        self.accounts
            .values()
            .filter(|a| a.division == Some(division))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Activates or deactivates an account
    pub fn set_active(&mut self, code: &str, active: bool) -> LedgerResult<()> {
        let account = self
            .accounts
            .get_mut(code)
            .ok_or_else(|| LedgerError::AccountNotFound(code.to_string()))?;
        account.is_active = active;
        Ok(())
    }

    /// Removes every account
    pub fn clear(&mut self) {
        self.accounts.clear();
    }

    /// Attaches a counterparty sub-ledger to an account
    ///
    /// Idempotent per (account, auxiliary code): an existing sub-ledger is
    /// returned unchanged.
    pub fn create_auxiliary_ledger(
        &mut self,
        account_code: &str,
        auxiliary_code: &str,
        name: &str,
        attributes: BTreeMap<String, String>,
    ) -> LedgerResult<&AuxiliaryLedger> {
        let account = self
            .accounts
            .get_mut(account_code)
            .ok_or_else(|| LedgerError::AccountNotFound(account_code.to_string()))?;
        Ok(account.insert_auxiliary_ledger(AuxiliaryLedger::new(auxiliary_code, name, attributes)))
    }

    /// Parent of an account, if it has one
    pub fn parent(&self, code: &str) -> LedgerResult<Option<&Account>> {
        let account = self.get(code)?;
        Ok(account.parent().and_then(|p| self.accounts.get(p)))
    }

    /// Direct children of an account, sorted by code
    pub fn children(&self, code: &str) -> LedgerResult<Vec<&Account>> {
        let account = self.get(code)?;
        Ok(account
            .children()
            .iter()
            .filter_map(|c| self.accounts.get(c))
            .collect())
    }

    /// Ancestors of an account, nearest first
    pub fn ancestors(&self, code: &str) -> LedgerResult<Vec<&Account>> {
        self.get(code)?;
        Ok(self
            .ancestor_codes(code)
            .iter()
            .filter_map(|c| self.accounts.get(c))
            .collect())
    }

    /// All descendants of an account in depth-first order
    pub fn descendants(&self, code: &str) -> LedgerResult<Vec<&Account>> {
        let root = self.get(code)?;
        let mut out = Vec::new();
        let mut stack: Vec<&str> = root.children().iter().rev().map(String::as_str).collect();
        while let Some(current) = stack.pop() {
            if let Some(account) = self.accounts.get(current) {
                out.push(account);
                stack.extend(account.children().iter().rev().map(String::as_str));
            }
        }
        Ok(out)
    }

    /// Depth in the hierarchy (0 = root)
    pub fn depth(&self, code: &str) -> LedgerResult<usize> {
        self.get(code)?;
        Ok(self.ancestor_codes(code).len())
    }

    /// Accounts with no parent, sorted by code
    pub fn roots(&self) -> Vec<&Account> {
        self.accounts.values().filter(|a| a.parent().is_none()).collect()
    }

    fn ancestor_codes(&self, code: &str) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        let mut current = self.accounts.get(code).and_then(|a| a.parent());
        while let Some(parent_code) = current {
            if !seen.insert(parent_code.to_string()) {
                break;
            }
            out.push(parent_code.to_string());
            current = self.accounts.get(parent_code).and_then(|a| a.parent());
        }
        out
    }

    /// Applies one posting to an account balance
    ///
    /// Existence and activeness are the caller's responsibility.
    pub(crate) fn post(&mut self, account_code: &str, amount: Money, is_debit: bool) -> LedgerResult<Money> {
        let account = self
            .accounts
            .get_mut(account_code)
            .ok_or_else(|| LedgerError::AccountNotFound(account_code.to_string()))?;
        let balance = account.apply(amount, is_debit)?;
        debug!(account = account_code, %amount, is_debit, %balance, "posted");
        Ok(balance)
    }

    /// Records a posting on a sub-ledger of an account
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn record_auxiliary(
        &mut self,
        account_code: &str,
        auxiliary_code: &str,
        journal_id: JournalId,
        date: NaiveDate,
        amount: Money,
        is_debit: bool,
        description: Option<String>,
    ) -> LedgerResult<()> {
        let account = self
            .accounts
            .get_mut(account_code)
            .ok_or_else(|| LedgerError::AccountNotFound(account_code.to_string()))?;
        let normal_balance = account.normal_balance;
        let ledger = account
            .auxiliary_ledger_mut(auxiliary_code)
            .ok_or_else(|| LedgerError::AuxiliaryLedgerNotFound {
                account_code: account_code.to_string(),
                auxiliary_code: auxiliary_code.to_string(),
            })?;
        ledger.record(normal_balance, journal_id, date, amount, is_debit, description)?;
        Ok(())
    }

    /// Zeroes every balance and drops every sub-ledger
    pub(crate) fn reset_balances(&mut self) {
        for account in self.accounts.values_mut() {
            account.reset();
        }
    }
}
