//! Unit-owner and vendor master records
//!
//! These records are not ledger state themselves. They seed the auxiliary
//! sub-ledgers on receivable and payable accounts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use domain_ledger::{ChartOfAccounts, LedgerResult};
use crate::error::SnapshotError;

/// An owner of one unit in the building
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UnitOwner {
    /// Auxiliary code used on owner sub-ledgers
    #[validate(length(min = 1))]
    pub code: String,
    #[validate(length(min = 1))]
    pub unit_number: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    /// Accounts carrying a sub-ledger for this owner
    #[serde(default)]
    pub receivable_accounts: Vec<String>,
}

impl UnitOwner {
    pub fn new(code: impl Into<String>, unit_number: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            unit_number: unit_number.into(),
            name: name.into(),
            contact: None,
            receivable_accounts: Vec::new(),
        }
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    pub fn with_account(mut self, account_code: impl Into<String>) -> Self {
        self.receivable_accounts.push(account_code.into());
        self
    }

    fn attributes(&self) -> BTreeMap<String, String> {
        let mut attributes = BTreeMap::new();
        attributes.insert("unitNumber".to_string(), self.unit_number.clone());
        if let Some(contact) = &self.contact {
            attributes.insert("contact".to_string(), contact.clone());
        }
        attributes
    }

    /// Checks required fields
    pub fn check(&self) -> Result<(), SnapshotError> {
        self.validate().map_err(|e| SnapshotError::InvalidRecord {
            kind: "unit owner",
            code: self.code.clone(),
            message: e.to_string(),
        })
    }

    /// Opens this owner's sub-ledger on each receivable account
    pub fn register(&self, chart: &mut ChartOfAccounts) -> LedgerResult<()> {
        for account_code in &self.receivable_accounts {
            chart.create_auxiliary_ledger(account_code, &self.code, &self.name, self.attributes())?;
        }
        Ok(())
    }
}

/// A supplier paid from one of the funds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    #[validate(length(min = 1))]
    pub code: String,
    #[validate(length(min = 1))]
    pub name: String,
    /// Accounts carrying a sub-ledger for this vendor
    #[serde(default)]
    pub payable_accounts: Vec<String>,
}

impl Vendor {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            payable_accounts: Vec::new(),
        }
    }

    pub fn with_account(mut self, account_code: impl Into<String>) -> Self {
        self.payable_accounts.push(account_code.into());
        self
    }

    pub fn check(&self) -> Result<(), SnapshotError> {
        self.validate().map_err(|e| SnapshotError::InvalidRecord {
            kind: "vendor",
            code: self.code.clone(),
            message: e.to_string(),
        })
    }

    /// Opens this vendor's sub-ledger on each payable account
    pub fn register(&self, chart: &mut ChartOfAccounts) -> LedgerResult<()> {
        for account_code in &self.payable_accounts {
            chart.create_auxiliary_ledger(account_code, &self.code, &self.name, BTreeMap::new())?;
        }
        Ok(())
    }
}
