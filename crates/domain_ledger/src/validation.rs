//! Journal validation pipeline
//!
//! Four steps run over an immutable view of the chart and the division
//! registry. Structural problems stop the pipeline early because later steps
//! depend on well-formed lines; the remaining steps accumulate errors so a
//! caller sees every problem with a journal at once.

use std::collections::BTreeMap;

use core_kernel::Money;
use crate::chart::ChartOfAccounts;
use crate::division::{DivisionCode, DivisionRegistry};
use crate::error::{LedgerError, LedgerResult, Rejection};
use crate::journal::{JournalDetail, JournalInput};

/// Runs every validation step and returns the normalized lines
///
/// # Errors
///
/// Returns a rejection listing every problem found
pub(crate) fn validate_input(
    input: &JournalInput,
    chart: &ChartOfAccounts,
    divisions: &DivisionRegistry,
) -> Result<Vec<JournalDetail>, Rejection> {
    let structural = check_structure(input, chart);
    if !structural.is_empty() {
        return Err(Rejection::new(structural));
    }

    let details: Vec<JournalDetail> = input.details.iter().map(JournalDetail::from_input).collect();

    let mut errors = check_accounts(&details, chart);
    if let Err(e) = check_balance(&details) {
        errors.push(e);
    }
    if let Some(division) = input.division {
        if let Err(e) = divisions.get(division) {
            errors.push(e);
        }
    }
    errors.extend(check_divisions(&details, chart, divisions));

    if errors.is_empty() {
        Ok(details)
    } else {
        Err(Rejection::new(errors))
    }
}

/// Step 1: date, lines, line shape and known account codes
fn check_structure(input: &JournalInput, chart: &ChartOfAccounts) -> Vec<LedgerError> {
    let mut errors = Vec::new();

    if input.date.is_none() {
        errors.push(LedgerError::MissingDate);
    }
    if input.details.is_empty() {
        errors.push(LedgerError::NoDetails);
    }

    for (index, detail) in input.details.iter().enumerate() {
        let line = index + 1;
        let code = detail.account_code.trim();
        if code.is_empty() {
            errors.push(LedgerError::MissingAccountCode { line });
        } else if !chart.contains(code) {
            errors.push(LedgerError::UnknownAccount {
                line,
                code: code.to_string(),
            });
        }

        let debit = detail.debit_amount.unwrap_or(Money::ZERO);
        let credit = detail.credit_amount.unwrap_or(Money::ZERO);
        if debit.is_negative() || credit.is_negative() {
            errors.push(LedgerError::NegativeAmount { line });
        } else if !debit.is_zero() && !credit.is_zero() {
            errors.push(LedgerError::BothSides { line });
        } else if debit.is_zero() && credit.is_zero() {
            errors.push(LedgerError::NoAmount { line });
        }
    }

    errors
}

/// Step 2: referenced accounts accept postings
fn check_accounts(details: &[JournalDetail], chart: &ChartOfAccounts) -> Vec<LedgerError> {
    let mut errors = Vec::new();

    for detail in details {
        let account = match chart.get(&detail.account_code) {
            Ok(account) => account,
            Err(e) => {
                errors.push(e);
                continue;
            }
        };

        if !account.is_active {
            errors.push(LedgerError::InactiveAccount(account.code.clone()));
        }
        if !account.is_postable {
            errors.push(LedgerError::NonPostableAccount(account.code.clone()));
        }
        if let Some(auxiliary_code) = &detail.auxiliary_code {
            if account.is_auxiliary_bearing() && account.auxiliary_ledger(auxiliary_code).is_none() {
                errors.push(LedgerError::AuxiliaryLedgerNotFound {
                    account_code: account.code.clone(),
                    auxiliary_code: auxiliary_code.clone(),
                });
            }
        }
    }

    errors.dedup();
    errors
}

/// Step 3: debits equal credits exactly
fn check_balance(details: &[JournalDetail]) -> Result<(), LedgerError> {
    let mut debits = Money::ZERO;
    let mut credits = Money::ZERO;
    for detail in details {
        debits = debits.checked_add(&detail.debit_amount)?;
        credits = credits.checked_add(&detail.credit_amount)?;
    }

    if debits == credits {
        Ok(())
    } else {
        Err(LedgerError::UnbalancedEntry {
            debits,
            credits,
            difference: debits.checked_sub(&credits)?.abs(),
        })
    }
}

/// Net debit per division touched by the lines
///
/// Untagged accounts belong to no division and are left out. Shared
/// accounts count as their own division so value parked there is still
/// subject to the reserve fund's outbound rule.
pub(crate) fn division_nets(
    details: &[JournalDetail],
    chart: &ChartOfAccounts,
) -> LedgerResult<BTreeMap<DivisionCode, Money>> {
    let mut nets: BTreeMap<DivisionCode, Money> = BTreeMap::new();
    for detail in details {
        let Ok(account) = chart.get(&detail.account_code) else {
            continue;
        };
        let Some(division) = account.division else {
            continue;
        };
        let net = nets.entry(division).or_default();
        *net = net
            .checked_add(&detail.debit_amount)?
            .checked_sub(&detail.credit_amount)?;
    }
    Ok(nets)
}

/// Step 4: value moving between divisions obeys transfer rules
///
/// A division whose lines net to a credit is giving value away; one that
/// nets to a debit is receiving it. Every giver/receiver pair is checked
/// against the receiver's inflow.
pub(crate) fn check_divisions(
    details: &[JournalDetail],
    chart: &ChartOfAccounts,
    divisions: &DivisionRegistry,
) -> Vec<LedgerError> {
    let nets = match division_nets(details, chart) {
        Ok(nets) => nets,
        Err(e) => return vec![e],
    };
    let sources: Vec<DivisionCode> = nets
        .iter()
        .filter(|(_, net)| net.is_negative())
        .map(|(code, _)| *code)
        .collect();
    let destinations: Vec<(DivisionCode, Money)> = nets
        .iter()
        .filter(|(_, net)| net.is_positive())
        .map(|(code, net)| (*code, *net))
        .collect();

    let mut errors = Vec::new();
    for source in &sources {
        for (destination, inflow) in &destinations {
            if let Err(e) = divisions.check_transfer(*source, *destination, *inflow) {
                errors.push(e);
            }
        }
    }
    errors
}
