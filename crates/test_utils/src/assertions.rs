//! Custom Test Assertions
//!
//! Assertion helpers for ledger state that give more meaningful failure
//! messages than comparing raw values.

use core_kernel::{Money, BALANCE_EPSILON};
use domain_ledger::{JournalEngine, LedgerError, Rejection};
use domain_reporting::ReportingEngine;

/// Asserts that the trial balance and balance sheet both balance
///
/// # Panics
///
/// Panics with the offending totals if either report is out of balance
pub fn assert_ledger_balanced(engine: &JournalEngine) {
    let reporting = ReportingEngine::new(engine);

    let trial = reporting.trial_balance();
    assert!(
        trial.is_balanced,
        "Trial balance out of balance: debit={}, credit={}",
        trial.total_debit,
        trial.total_credit
    );

    let sheet = reporting.balance_sheet();
    assert!(
        sheet.is_balanced,
        "Balance sheet out of balance: assets={}, liabilities={}, equity={}",
        sheet.total_assets,
        sheet.total_liabilities,
        sheet.total_equity
    );
}

/// Asserts an account's signed balance
pub fn assert_account_balance(engine: &JournalEngine, code: &str, expected: Money) {
    let actual = engine
        .account_balance(code)
        .unwrap_or_else(|e| panic!("account {code}: {e}"));
    assert_eq!(actual, expected, "Balance mismatch on account {code}");
}

/// Asserts a counterparty sub-ledger balance
pub fn assert_auxiliary_balance(engine: &JournalEngine, account: &str, auxiliary: &str, expected: Money) {
    let ledger = engine
        .chart()
        .get(account)
        .ok()
        .and_then(|a| a.auxiliary_ledger(auxiliary))
        .unwrap_or_else(|| panic!("no sub-ledger {auxiliary} on account {account}"));
    assert_eq!(ledger.balance(), expected, "Balance mismatch on {account}/{auxiliary}");
}

/// Asserts that a rejection contains an error matching the predicate
pub fn assert_rejected_with(rejection: &Rejection, predicate: impl Fn(&LedgerError) -> bool) {
    assert!(
        rejection.any(predicate),
        "Expected error not found in rejection: {:?}",
        rejection.messages()
    );
}

/// Asserts that two Money values are within the balance epsilon
pub fn assert_money_approx_eq(actual: Money, expected: Money) {
    assert!(
        actual.approx_eq(&expected, BALANCE_EPSILON),
        "Money amounts differ: actual={actual}, expected={expected}"
    );
}
