//! Opening balances
//!
//! Brings a ledger up from balances carried over from a previous system.
//! The entered figures rarely balance to the cent, so the difference is
//! plugged into a designated surplus account.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use core_kernel::{Money, BALANCE_EPSILON};
use crate::engine::JournalEngine;
use crate::error::Rejection;
use crate::journal::{CreateOptions, Journal, JournalDetailInput, JournalInput};

/// One carried-over account balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningEntry {
    pub account_code: String,
    #[serde(default)]
    pub debit_amount: Money,
    #[serde(default)]
    pub credit_amount: Money,
}

/// A set of opening balances as of one date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningBalance {
    pub date: NaiveDate,
    pub description: String,
    pub entries: Vec<OpeningEntry>,
}

impl OpeningBalance {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            description: "Opening balances".to_string(),
            entries: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Adds a carried-over balance
    pub fn entry(mut self, account_code: impl Into<String>, debit: Money, credit: Money) -> Self {
        self.entries.push(OpeningEntry {
            account_code: account_code.into(),
            debit_amount: debit,
            credit_amount: credit,
        });
        self
    }

    /// Builds the journal input, plugging any difference into `surplus_account`
    ///
    /// Returns the input and the plugged difference (debits minus credits of
    /// the entered figures).
    pub fn to_input(&self, surplus_account: &str) -> (JournalInput, Money) {
        let mut input = JournalInput::new(self.date, self.description.clone());
        let mut difference = Money::ZERO;

        for entry in &self.entries {
            let net = entry.debit_amount - entry.credit_amount;
            if net.is_positive() {
                input = input.debit(entry.account_code.clone(), net);
            } else if net.is_negative() {
                input = input.credit(entry.account_code.clone(), -net);
            } else {
                continue;
            }
            difference += net;
        }

        if difference.is_positive() {
            input = input.line(
                JournalDetailInput::credit(surplus_account, difference)
                    .with_description("Opening balance difference"),
            );
        } else if difference.is_negative() {
            input = input.line(
                JournalDetailInput::debit(surplus_account, -difference)
                    .with_description("Opening balance difference"),
            );
        }

        (input, difference)
    }
}

impl JournalEngine {
    /// Records and posts opening balances as a single journal
    ///
    /// Zero entries are skipped. The stored journal is always balanced.
    ///
    /// # Errors
    ///
    /// Returns a rejection if an account is unknown or inactive, if no entry
    /// is non-zero, or if division transfer rules forbid the result.
    #[instrument(skip(self, request), fields(date = %request.date, entries = request.entries.len()))]
    pub fn record_opening_balances(
        &mut self,
        request: &OpeningBalance,
        surplus_account: &str,
    ) -> Result<Journal, Rejection> {
        let (input, difference) = request.to_input(surplus_account);

        if difference.abs() > BALANCE_EPSILON {
            warn!(%difference, surplus_account, "opening balances do not balance, difference plugged into surplus");
        }

        let journal = self.create_journal(input, CreateOptions::auto_post())?;
        info!(journal_id = %journal.id, %difference, "opening balances recorded");
        Ok(journal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
    }

    #[test]
    fn test_difference_plugged_to_surplus() {
        let request = OpeningBalance::new(date())
            .entry("1120", Money::new(dec!(1000.005)), Money::ZERO)
            .entry("2110", Money::ZERO, Money::new(dec!(400)))
            .entry("1300", Money::ZERO, Money::ZERO);

        let (input, difference) = request.to_input("3100");

        assert_eq!(difference, Money::new(dec!(600.005)));
        assert_eq!(input.details.len(), 3);
        let plug = &input.details[2];
        assert_eq!(plug.account_code, "3100");
        assert_eq!(plug.credit_amount, Some(Money::new(dec!(600.005))));
    }

    #[test]
    fn test_both_sides_are_netted() {
        let request = OpeningBalance::new(date()).entry("1120", Money::new(dec!(100)), Money::new(dec!(300)));
        let (input, difference) = request.to_input("3100");

        assert_eq!(input.details[0].credit_amount, Some(Money::new(dec!(200))));
        assert_eq!(input.details[1].debit_amount, Some(Money::new(dec!(200))));
        assert_eq!(difference, Money::new(dec!(-200)));
    }

    #[test]
    fn test_recorded_journal_is_posted_and_balanced() {
        let mut engine = JournalEngine::with_standard_chart();
        let request = OpeningBalance::new(date())
            .entry("1120", Money::new(dec!(500000)), Money::ZERO)
            .entry("2110", Money::ZERO, Money::new(dec!(0.003)));

        let journal = engine.record_opening_balances(&request, "3100").unwrap();

        assert!(journal.is_posted());
        assert!(journal.is_balanced());
        assert_eq!(engine.account_balance("1120").unwrap(), Money::new(dec!(500000)));
    }
}
