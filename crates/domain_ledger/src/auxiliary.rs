//! Counterparty sub-ledgers
//!
//! An auxiliary ledger breaks one control account down by counterparty, e.g.
//! the management-fee receivable per unit owner. Its history is append-only.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{AuxiliaryEntryId, JournalId, Money, MoneyError};
use crate::account::NormalBalance;

/// One posting recorded on a sub-ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxiliaryTransaction {
    pub id: AuxiliaryEntryId,
    /// Journal that produced this entry
    pub journal_id: JournalId,
    pub date: NaiveDate,
    /// Amount (always positive)
    pub amount: Money,
    pub is_debit: bool,
    /// Sub-ledger balance after this entry
    pub running_balance: Money,
    pub description: Option<String>,
}

/// A per-counterparty sub-ledger attached to one account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuxiliaryLedger {
    /// Counterparty code (e.g. unit owner code)
    pub code: String,
    /// Counterparty name
    pub name: String,
    /// Free-form attributes (unit number, contact, ...)
    pub attributes: BTreeMap<String, String>,
    balance: Money,
    transactions: Vec<AuxiliaryTransaction>,
}

impl AuxiliaryLedger {
    /// Creates an empty sub-ledger
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        attributes: BTreeMap<String, String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            attributes,
            balance: Money::ZERO,
            transactions: Vec::new(),
        }
    }

    /// Signed balance, relative to the owning account's normal balance
    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Entries in posting order
    pub fn transactions(&self) -> &[AuxiliaryTransaction] {
        &self.transactions
    }

    pub(crate) fn record(
        &mut self,
        normal_balance: NormalBalance,
        journal_id: JournalId,
        date: NaiveDate,
        amount: Money,
        is_debit: bool,
        description: Option<String>,
    ) -> Result<&AuxiliaryTransaction, MoneyError> {
        let change = normal_balance.signed_change(amount, is_debit);
        self.balance = self.balance.checked_add(&change)?;

        self.transactions.push(AuxiliaryTransaction {
            id: AuxiliaryEntryId::new_v7(),
            journal_id,
            date,
            amount,
            is_debit,
            running_balance: self.balance,
            description,
        });

        Ok(&self.transactions[self.transactions.len() - 1])
    }
}
