//! Property-Based Test Generators
//!
//! Proptest strategies producing amounts and journal inputs that respect
//! the ledger's invariants.

use core_kernel::Money;
use domain_ledger::JournalInput;
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::fixtures::day;

/// Management-fund and untagged accounts, freely combinable
pub const MANAGEMENT_ACCOUNTS: [&str; 8] = ["1120", "1300", "2110", "3100", "4100", "4400", "5110", "5140"];

/// Strategy for positive amounts with two decimal places
pub fn positive_money_strategy() -> impl Strategy<Value = Money> {
    (1i64..100_000_000i64).prop_map(|cents| Money::new(Decimal::new(cents, 2)))
}

/// Strategy for positive amounts with up to four decimal places
pub fn precise_money_strategy() -> impl Strategy<Value = Money> {
    (1i64..1_000_000_000i64, 0u32..=4u32).prop_map(|(m, s)| Money::new(Decimal::new(m, s)))
}

/// Strategy for a balanced journal over management accounts
///
/// Produces one to four debit lines and a single balancing credit.
pub fn balanced_journal_strategy() -> impl Strategy<Value = JournalInput> {
    (
        prop::collection::vec((0..MANAGEMENT_ACCOUNTS.len(), positive_money_strategy()), 1..5),
        0..MANAGEMENT_ACCOUNTS.len(),
        1u32..28u32,
    )
        .prop_map(|(debits, credit, date)| {
            let total: Money = debits.iter().map(|(_, amount)| *amount).sum();
            let mut input = JournalInput::new(day(5, date), "Generated");
            for (account, amount) in debits {
                input = input.debit(MANAGEMENT_ACCOUNTS[account], amount);
            }
            input.credit(MANAGEMENT_ACCOUNTS[credit], total)
        })
}

/// Strategy for an unbalanced journal over management accounts
pub fn unbalanced_journal_strategy() -> impl Strategy<Value = JournalInput> {
    (
        0..MANAGEMENT_ACCOUNTS.len(),
        0..MANAGEMENT_ACCOUNTS.len(),
        positive_money_strategy(),
        positive_money_strategy(),
    )
        .prop_filter("amounts must differ", |(_, _, a, b)| a != b)
        .prop_map(|(debit, credit, a, b)| {
            JournalInput::new(day(5, 1), "Generated")
                .debit(MANAGEMENT_ACCOUNTS[debit], a)
                .credit(MANAGEMENT_ACCOUNTS[credit], b)
        })
}
