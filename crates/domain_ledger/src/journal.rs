//! Journal entries and the journal-creation contract

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{JournalId, Money};
use crate::division::DivisionCode;
use crate::error::Rejection;

/// Journal lifecycle status
///
/// Transitions strictly forward: DRAFT, SUBMITTED, APPROVED, POSTED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JournalStatus {
    Draft,
    Submitted,
    Approved,
    /// Terminal; the journal has affected balances
    Posted,
}

impl JournalStatus {
    /// The only status reachable from this one
    pub fn next(&self) -> Option<JournalStatus> {
        match self {
            JournalStatus::Draft => Some(JournalStatus::Submitted),
            JournalStatus::Submitted => Some(JournalStatus::Approved),
            JournalStatus::Approved => Some(JournalStatus::Posted),
            JournalStatus::Posted => None,
        }
    }

    /// Whether the journal may still be edited or deleted
    pub fn is_editable(&self) -> bool {
        !matches!(self, JournalStatus::Posted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JournalStatus::Draft => "DRAFT",
            JournalStatus::Submitted => "SUBMITTED",
            JournalStatus::Approved => "APPROVED",
            JournalStatus::Posted => "POSTED",
        }
    }
}

impl fmt::Display for JournalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One input line of the journal-creation contract
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalDetailInput {
    pub account_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debit_amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auxiliary_code: Option<String>,
}

impl JournalDetailInput {
    pub fn debit(account_code: impl Into<String>, amount: Money) -> Self {
        Self {
            account_code: account_code.into(),
            debit_amount: Some(amount),
            ..Default::default()
        }
    }

    pub fn credit(account_code: impl Into<String>, amount: Money) -> Self {
        Self {
            account_code: account_code.into(),
            credit_amount: Some(amount),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_auxiliary(mut self, auxiliary_code: impl Into<String>) -> Self {
        self.auxiliary_code = Some(auxiliary_code.into());
        self
    }
}

/// Input of the journal-creation contract
///
/// Every producer of journals (data entry, import, closing, billing) builds
/// one of these and hands it to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalInput {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division: Option<DivisionCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default)]
    pub details: Vec<JournalDetailInput>,
}

impl JournalInput {
    /// Starts an input with a date and description and no lines
    pub fn new(date: NaiveDate, description: impl Into<String>) -> Self {
        Self {
            date: Some(date),
            description: description.into(),
            ..Default::default()
        }
    }

    /// Adds a debit line
    pub fn debit(mut self, account_code: impl Into<String>, amount: Money) -> Self {
        self.details.push(JournalDetailInput::debit(account_code, amount));
        self
    }

    /// Adds a credit line
    pub fn credit(mut self, account_code: impl Into<String>, amount: Money) -> Self {
        self.details.push(JournalDetailInput::credit(account_code, amount));
        self
    }

    /// Adds an arbitrary line
    pub fn line(mut self, detail: JournalDetailInput) -> Self {
        self.details.push(detail);
        self
    }

    pub fn with_division(mut self, division: DivisionCode) -> Self {
        self.division = Some(division);
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

/// Options for journal creation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOptions {
    /// Validate and post in one step
    #[serde(default)]
    pub auto_post: bool,
}

impl CreateOptions {
    pub fn auto_post() -> Self {
        Self { auto_post: true }
    }
}

/// An accepted journal line
///
/// Exactly one of the two amounts is non-zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalDetail {
    pub account_code: String,
    pub debit_amount: Money,
    pub credit_amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auxiliary_code: Option<String>,
}

impl JournalDetail {
    pub(crate) fn from_input(input: &JournalDetailInput) -> Self {
        Self {
            account_code: input.account_code.trim().to_string(),
            debit_amount: input.debit_amount.unwrap_or(Money::ZERO),
            credit_amount: input.credit_amount.unwrap_or(Money::ZERO),
            description: input.description.clone(),
            auxiliary_code: input.auxiliary_code.clone(),
        }
    }

    /// Whether this is a debit line
    pub fn is_debit(&self) -> bool {
        !self.debit_amount.is_zero()
    }

    /// The line amount on whichever side it sits
    pub fn amount(&self) -> Money {
        if self.is_debit() {
            self.debit_amount
        } else {
            self.credit_amount
        }
    }

    pub fn to_input(&self) -> JournalDetailInput {
        JournalDetailInput {
            account_code: self.account_code.clone(),
            debit_amount: (!self.debit_amount.is_zero()).then_some(self.debit_amount),
            credit_amount: (!self.credit_amount.is_zero()).then_some(self.credit_amount),
            description: self.description.clone(),
            auxiliary_code: self.auxiliary_code.clone(),
        }
    }
}

/// A recorded journal entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Journal {
    pub id: JournalId,
    /// Zero-padded display sequence number
    pub number: String,
    pub date: NaiveDate,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division: Option<DivisionCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub details: Vec<JournalDetail>,
    pub status: JournalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<DateTime<Utc>>,
}

impl Journal {
    /// Sum of debit amounts
    pub fn debit_total(&self) -> Money {
        self.details.iter().map(|d| d.debit_amount).sum()
    }

    /// Sum of credit amounts
    pub fn credit_total(&self) -> Money {
        self.details.iter().map(|d| d.credit_amount).sum()
    }

    /// Debits equal credits exactly
    pub fn is_balanced(&self) -> bool {
        self.debit_total() == self.credit_total()
    }

    pub fn is_posted(&self) -> bool {
        self.status == JournalStatus::Posted
    }

    /// Rebuilds the creation input this journal would be created from
    pub fn to_input(&self) -> JournalInput {
        JournalInput {
            date: Some(self.date),
            description: self.description.clone(),
            division: self.division,
            reference: self.reference.clone(),
            details: self.details.iter().map(JournalDetail::to_input).collect(),
        }
    }
}

/// Wire form of a journal operation result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Journal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl From<Result<Journal, Rejection>> for JournalResponse {
    fn from(result: Result<Journal, Rejection>) -> Self {
        match result {
            Ok(journal) => Self {
                success: true,
                data: Some(journal),
                errors: None,
            },
            Err(rejection) => Self {
                success: false,
                data: None,
                errors: Some(rejection.messages()),
            },
        }
    }
}
