//! Behavioural tests for domain_ledger

use std::collections::BTreeMap;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::Money;
use domain_ledger::{
    AccountDefinition, AccountType, ClosingEngine, CreateOptions, DivisionCode, ErrorKind,
    JournalDetailInput, JournalEngine, JournalInput, JournalResponse, JournalStatus, LedgerError,
    OpeningBalance, StandardChart,
};

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

fn money(amount: Decimal) -> Money {
    Money::new(amount)
}

fn engine_with_owner() -> JournalEngine {
    let mut engine = JournalEngine::with_standard_chart();
    engine
        .chart_mut()
        .create_auxiliary_ledger("1210", "OWN-101", "Unit 101 - Sato", BTreeMap::new())
        .unwrap();
    engine
}

/// Sum of net debits over every account; zero whenever debits equal credits
fn ledger_net(engine: &JournalEngine) -> Money {
    engine.chart().list().iter().map(|a| a.net_debit()).sum()
}

// ============================================================================
// Journal Lifecycle Tests
// ============================================================================

mod lifecycle_tests {
    use super::*;

    #[test]
    fn test_auto_post_applies_immediately() {
        let mut engine = JournalEngine::with_standard_chart();
        let journal = engine
            .create_journal(
                JournalInput::new(date(4, 1), "Fees")
                    .debit("1120", money(dec!(15000)))
                    .credit("4100", money(dec!(15000))),
                CreateOptions::auto_post(),
            )
            .unwrap();

        assert_eq!(journal.status, JournalStatus::Posted);
        assert_eq!(engine.account_balance("1120").unwrap(), money(dec!(15000)));
        assert_eq!(engine.account_balance("4100").unwrap(), money(dec!(15000)));
        assert_eq!(engine.journals_with_status(JournalStatus::Posted).len(), 1);
    }

    #[test]
    fn test_posted_journal_cannot_be_edited_or_deleted() {
        let mut engine = JournalEngine::with_standard_chart();
        let input = JournalInput::new(date(4, 1), "Fees")
            .debit("1120", money(dec!(100)))
            .credit("4100", money(dec!(100)));
        let journal = engine.create_journal(input.clone(), CreateOptions::auto_post()).unwrap();

        let update = engine.update_journal(journal.id, input).unwrap_err();
        assert_eq!(update.kind(), Some(ErrorKind::State));

        let delete = engine.delete_journal(journal.id).unwrap_err();
        assert!(delete.any(|e| matches!(e, LedgerError::PostedJournalImmutable(_))));
        assert_eq!(engine.journals().len(), 1);
        assert_eq!(engine.account_balance("1120").unwrap(), money(dec!(100)));
    }

    #[test]
    fn test_draft_edit_and_delete_have_no_balance_effect() {
        let mut engine = JournalEngine::with_standard_chart();
        let journal = engine
            .create_journal(
                JournalInput::new(date(4, 1), "Fees")
                    .debit("1120", money(dec!(100)))
                    .credit("4100", money(dec!(100))),
                CreateOptions::default(),
            )
            .unwrap();

        let updated = engine
            .update_journal(
                journal.id,
                JournalInput::new(date(4, 2), "Fees corrected")
                    .debit("1120", money(dec!(120)))
                    .credit("4100", money(dec!(120))),
            )
            .unwrap();
        assert_eq!(updated.number, journal.number);
        assert_eq!(updated.debit_total(), money(dec!(120)));

        engine.delete_journal(journal.id).unwrap();
        assert!(engine.journals().is_empty());
        assert_eq!(engine.account_balance("1120").unwrap(), Money::ZERO);
    }

    #[test]
    fn test_update_revalidates_content() {
        let mut engine = JournalEngine::with_standard_chart();
        let journal = engine
            .create_journal(
                JournalInput::new(date(4, 1), "Fees")
                    .debit("1120", money(dec!(100)))
                    .credit("4100", money(dec!(100))),
                CreateOptions::default(),
            )
            .unwrap();

        let rejection = engine
            .update_journal(
                journal.id,
                JournalInput::new(date(4, 1), "Bad")
                    .debit("1120", money(dec!(100)))
                    .credit("4100", money(dec!(90))),
            )
            .unwrap_err();

        assert!(rejection.any(|e| matches!(e, LedgerError::UnbalancedEntry { .. })));
        assert_eq!(engine.get_journal(journal.id).unwrap().debit_total(), money(dec!(100)));
    }

    #[test]
    fn test_unknown_journal_is_not_found() {
        let mut engine = JournalEngine::with_standard_chart();
        let id = core_kernel::JournalId::new();

        assert!(matches!(engine.get_journal(id), Err(LedgerError::JournalNotFound(_))));
        assert_eq!(engine.submit_journal(id).unwrap_err().kind(), Some(ErrorKind::NotFound));
    }

    #[test]
    fn test_reversal_restores_balances() {
        let mut engine = engine_with_owner();
        let original = engine
            .create_journal(
                JournalInput::new(date(4, 1), "Fee billed")
                    .line(JournalDetailInput::debit("1210", money(dec!(15000))).with_auxiliary("OWN-101"))
                    .credit("4100", money(dec!(15000))),
                CreateOptions::auto_post(),
            )
            .unwrap();

        let reversal = engine.reverse_journal(original.id, date(4, 2), "Billed in error").unwrap();

        assert_eq!(reversal.reference.as_deref(), Some(original.number.as_str()));
        assert_eq!(reversal.details[0].credit_amount, money(dec!(15000)));
        assert_eq!(engine.account_balance("1210").unwrap(), Money::ZERO);
        assert_eq!(engine.account_balance("4100").unwrap(), Money::ZERO);

        let ledger = engine.chart().get("1210").unwrap().auxiliary_ledger("OWN-101").unwrap();
        assert_eq!(ledger.transactions().len(), 2);
        assert_eq!(ledger.balance(), Money::ZERO);
    }

    #[test]
    fn test_response_contract() {
        let mut engine = JournalEngine::with_standard_chart();
        let ok: JournalResponse = engine
            .create_journal(
                JournalInput::new(date(4, 1), "Fees")
                    .debit("1120", money(dec!(10)))
                    .credit("4100", money(dec!(10))),
                CreateOptions::default(),
            )
            .into();
        assert!(ok.success);
        assert!(ok.errors.is_none());

        let failed: JournalResponse = engine
            .create_journal(JournalInput::new(date(4, 1), "Empty"), CreateOptions::default())
            .into();
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("data").is_none());
        assert_eq!(json["errors"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_reset_clears_state_and_numbering() {
        let mut engine = engine_with_owner();
        engine
            .create_journal(
                JournalInput::new(date(4, 1), "Fees")
                    .debit("1120", money(dec!(10)))
                    .credit("4100", money(dec!(10))),
                CreateOptions::auto_post(),
            )
            .unwrap();

        engine.reset();

        assert!(engine.journals().is_empty());
        assert_eq!(engine.account_balance("1120").unwrap(), Money::ZERO);
        assert!(engine.chart().get("1210").unwrap().auxiliary_ledger("OWN-101").is_none());
        let next = engine
            .create_journal(
                JournalInput::new(date(4, 1), "Fees")
                    .debit("1120", money(dec!(10)))
                    .credit("4100", money(dec!(10))),
                CreateOptions::default(),
            )
            .unwrap();
        assert_eq!(next.number, "000001");
    }
}

// ============================================================================
// Validation Tests
// ============================================================================

mod validation_tests {
    use super::*;

    #[test]
    fn test_unbalanced_journal_rejected_without_mutation() {
        let mut engine = JournalEngine::with_standard_chart();
        let rejection = engine
            .create_journal(
                JournalInput::new(date(4, 1), "Unbalanced")
                    .debit("1120", money(dec!(1000)))
                    .credit("4100", money(dec!(500))),
                CreateOptions::auto_post(),
            )
            .unwrap_err();

        assert!(!rejection.messages().is_empty());
        assert!(rejection.any(|e| matches!(
            e,
            LedgerError::UnbalancedEntry { difference, .. } if *difference == Money::new(dec!(500))
        )));
        assert_eq!(engine.account_balance("1120").unwrap(), Money::ZERO);
        assert_eq!(engine.account_balance("4100").unwrap(), Money::ZERO);
        assert!(engine.journals().is_empty());
    }

    #[test]
    fn test_unknown_account_rejected_without_mutation() {
        let mut engine = JournalEngine::with_standard_chart();
        let rejection = engine
            .create_journal(
                JournalInput::new(date(4, 1), "Typo")
                    .debit("1120", money(dec!(100)))
                    .credit("4999", money(dec!(100))),
                CreateOptions::auto_post(),
            )
            .unwrap_err();

        assert_eq!(rejection.kind(), Some(ErrorKind::Validation));
        assert!(rejection.any(|e| matches!(e, LedgerError::UnknownAccount { code, .. } if code == "4999")));
        assert_eq!(engine.account_balance("1120").unwrap(), Money::ZERO);
        assert!(engine.journals().is_empty());
    }

    #[test]
    fn test_inactive_account_rejected() {
        let mut engine = JournalEngine::with_standard_chart();
        engine.chart_mut().set_active("5110", false).unwrap();

        let rejection = engine
            .create_journal(
                JournalInput::new(date(4, 1), "Cleaning")
                    .debit("5110", money(dec!(100)))
                    .credit("1120", money(dec!(100))),
                CreateOptions::default(),
            )
            .unwrap_err();

        assert!(rejection.any(|e| matches!(e, LedgerError::InactiveAccount(c) if c == "5110")));
    }

    #[test]
    fn test_missing_auxiliary_ledger_rejected() {
        let mut engine = JournalEngine::with_standard_chart();
        let rejection = engine
            .create_journal(
                JournalInput::new(date(4, 1), "Fee")
                    .line(JournalDetailInput::debit("1210", money(dec!(100))).with_auxiliary("OWN-999"))
                    .credit("4100", money(dec!(100))),
                CreateOptions::auto_post(),
            )
            .unwrap_err();

        assert!(rejection.any(|e| matches!(e, LedgerError::AuxiliaryLedgerNotFound { .. })));
    }

    #[test]
    fn test_auxiliary_code_ignored_on_plain_account() {
        let mut engine = JournalEngine::with_standard_chart();
        let journal = engine
            .create_journal(
                JournalInput::new(date(4, 1), "Fee")
                    .line(JournalDetailInput::debit("1120", money(dec!(100))).with_auxiliary("OWN-101"))
                    .credit("4100", money(dec!(100))),
                CreateOptions::auto_post(),
            )
            .unwrap();

        assert_eq!(journal.details[0].auxiliary_code.as_deref(), Some("OWN-101"));
        assert_eq!(engine.account_balance("1120").unwrap(), money(dec!(100)));
    }

    #[test]
    fn test_json_amounts_beyond_storage_precision_are_rounded_first() {
        let mut engine = JournalEngine::with_standard_chart();
        let input: JournalInput = serde_json::from_str(
            r#"{
                "date": "2024-04-01",
                "description": "Rounding",
                "details": [
                    {"accountCode": "1120", "debitAmount": "0.00014"},
                    {"accountCode": "1120", "debitAmount": "0.00014"},
                    {"accountCode": "4100", "creditAmount": "0.0003"}
                ]
            }"#,
        )
        .unwrap();

        let rejection = engine.create_journal(input, CreateOptions::auto_post()).unwrap_err();
        assert!(rejection.any(|e| matches!(
            e,
            LedgerError::UnbalancedEntry { debits, .. } if *debits == money(dec!(0.0002))
        )));
        assert!(engine.journals().is_empty());
    }

    #[test]
    fn test_validate_is_a_dry_run() {
        let engine = JournalEngine::with_standard_chart();
        let input = JournalInput::new(date(4, 1), "Fees")
            .debit("1120", money(dec!(100)))
            .credit("4100", money(dec!(100)));

        assert!(engine.validate(&input).is_ok());
        assert!(engine.journals().is_empty());
    }
}

// ============================================================================
// Division Tests
// ============================================================================

mod division_tests {
    use super::*;

    #[test]
    fn test_reserve_cannot_fund_management() {
        let mut engine = JournalEngine::with_standard_chart();
        let input = JournalInput::new(date(4, 1), "Borrow from reserve")
            .debit("1120", money(dec!(100000)))
            .credit("1130", money(dec!(100000)));

        let precheck = engine.validate_division_accounting(&input).unwrap_err();
        assert!(precheck.any(|e| matches!(
            e,
            LedgerError::TransferNotPermitted { from: DivisionCode::Reserve, to: DivisionCode::Management }
        )));

        assert!(engine.create_journal(input, CreateOptions::auto_post()).is_err());
        assert_eq!(engine.account_balance("1130").unwrap(), Money::ZERO);
    }

    #[test]
    fn test_reserve_cannot_move_into_shared_cash() {
        let mut engine = JournalEngine::with_standard_chart();
        let input = JournalInput::new(date(4, 1), "Withdraw reserve to cash box")
            .debit("1110", money(dec!(30000)))
            .credit("1130", money(dec!(30000)));

        let rejection = engine.create_journal(input, CreateOptions::auto_post()).unwrap_err();
        assert!(rejection.any(|e| matches!(
            e,
            LedgerError::TransferNotPermitted { from: DivisionCode::Reserve, to: DivisionCode::Shared }
        )));
        assert_eq!(engine.account_balance("1110").unwrap(), Money::ZERO);
        assert_eq!(engine.account_balance("1130").unwrap(), Money::ZERO);
    }

    #[test]
    fn test_management_may_fund_reserve_within_limit() {
        let mut engine = JournalEngine::with_standard_chart();
        engine
            .divisions_mut()
            .set_transfer_limit(DivisionCode::Management, DivisionCode::Reserve, money(dec!(50000)))
            .unwrap();

        let within = JournalInput::new(date(4, 1), "Transfer")
            .debit("1130", money(dec!(50000)))
            .credit("1120", money(dec!(50000)));
        assert!(engine.create_journal(within, CreateOptions::auto_post()).is_ok());

        let over = JournalInput::new(date(4, 2), "Transfer")
            .debit("1130", money(dec!(50000.01)))
            .credit("1120", money(dec!(50000.01)));
        let rejection = engine.create_journal(over, CreateOptions::auto_post()).unwrap_err();
        assert!(rejection.any(|e| matches!(e, LedgerError::TransferLimitExceeded { .. })));
    }

    #[test]
    fn test_division_tag_must_exist() {
        let mut engine = JournalEngine::with_standard_chart();
        engine.divisions_mut().clear();

        let rejection = engine
            .create_journal(
                JournalInput::new(date(4, 1), "Fees")
                    .debit("1120", money(dec!(10)))
                    .credit("4100", money(dec!(10)))
                    .with_division(DivisionCode::Management),
                CreateOptions::default(),
            )
            .unwrap_err();

        assert!(rejection.any(|e| matches!(e, LedgerError::DivisionNotFound(_))));
    }
}

// ============================================================================
// Opening Balance & Closing Tests
// ============================================================================

mod period_tests {
    use super::*;

    #[test]
    fn test_opening_balances_always_balanced() {
        let mut engine = JournalEngine::with_standard_chart();
        let request = OpeningBalance::new(date(4, 1))
            .entry("1120", money(dec!(1200000)), Money::ZERO)
            .entry("2200", Money::ZERO, money(dec!(150000)));

        let journal = engine
            .record_opening_balances(&request, StandardChart::MANAGEMENT_SURPLUS)
            .unwrap();

        assert!(journal.is_balanced());
        assert_eq!(engine.account_balance("3100").unwrap(), money(dec!(1050000)));
        assert_eq!(ledger_net(&engine), Money::ZERO);
    }

    #[test]
    fn test_closing_zeroes_division_income_statement() {
        let mut engine = JournalEngine::with_standard_chart();
        engine
            .create_journal(
                JournalInput::new(date(5, 1), "Parking fee")
                    .debit("1140", money(dec!(500)))
                    .credit("4300", money(dec!(500))),
                CreateOptions::auto_post(),
            )
            .unwrap();
        engine
            .create_journal(
                JournalInput::new(date(5, 2), "Parking repair")
                    .debit("5300", money(dec!(500)))
                    .credit("1140", money(dec!(500))),
                CreateOptions::auto_post(),
            )
            .unwrap();

        let result = ClosingEngine::standard().close_division(&mut engine, DivisionCode::Parking, date(3, 31));

        assert!(result.success);
        assert!(result.journal_id.is_some());
        assert_eq!(result.net_income, Money::ZERO);
        assert_eq!(engine.account_balance("4300").unwrap(), Money::ZERO);
        assert_eq!(engine.account_balance("5300").unwrap(), Money::ZERO);

        let closing = engine.get_journal(result.journal_id.unwrap()).unwrap();
        assert_eq!(closing.details.len(), 2);
    }

    #[test]
    fn test_close_period_handles_each_required_division() {
        let mut engine = JournalEngine::with_standard_chart();
        engine
            .create_journal(
                JournalInput::new(date(5, 1), "Fees")
                    .debit("1120", money(dec!(1000)))
                    .credit("4100", money(dec!(1000))),
                CreateOptions::auto_post(),
            )
            .unwrap();
        engine
            .create_journal(
                JournalInput::new(date(5, 3), "Major repair")
                    .debit("5200", money(dec!(300)))
                    .credit("1130", money(dec!(300))),
                CreateOptions::auto_post(),
            )
            .unwrap();

        let report = ClosingEngine::standard().close_period(&mut engine, date(3, 31));

        assert!(report.all_succeeded());
        assert_eq!(report.results.len(), 3);
        assert_eq!(report.closed_journals().len(), 2);
        assert_eq!(engine.account_balance("3100").unwrap(), money(dec!(1000)));
        assert_eq!(engine.account_balance("3200").unwrap(), money(dec!(-300)));

        let parking = report.results.iter().find(|r| r.division == DivisionCode::Parking).unwrap();
        assert!(parking.success);
        assert!(parking.journal_id.is_none());
    }
}

// ============================================================================
// Chart Tests
// ============================================================================

mod chart_tests {
    use super::*;

    #[test]
    fn test_list_sorted_by_code() {
        let engine = JournalEngine::with_standard_chart();
        let codes: Vec<_> = engine.chart().list().iter().map(|a| a.code.clone()).collect();
        let mut sorted = codes.clone();
        sorted.sort();
        assert_eq!(codes, sorted);
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let engine = JournalEngine::with_standard_chart();
        let ancestors: Vec<_> = engine
            .chart()
            .ancestors("1210")
            .unwrap()
            .iter()
            .map(|a| a.code.clone())
            .collect();
        assert_eq!(ancestors, vec!["1200", "1000"]);
    }

    #[test]
    fn test_added_account_accepts_postings() {
        let mut engine = JournalEngine::with_standard_chart();
        engine
            .chart_mut()
            .add_or_update(
                AccountDefinition::new("5150", "Elevator maintenance", AccountType::Expense)
                    .with_division(DivisionCode::Management),
            )
            .unwrap();

        let journal = engine.create_journal(
            JournalInput::new(date(4, 1), "Elevator")
                .debit("5150", money(dec!(80)))
                .credit("1120", money(dec!(80))),
            CreateOptions::auto_post(),
        );
        assert!(journal.is_ok());
    }
}

// ============================================================================
// Property Tests
// ============================================================================

mod property_tests {
    use super::*;

    const POSTABLE: [&str; 6] = ["1120", "1300", "2110", "4100", "5110", "5120"];

    proptest! {
        #[test]
        fn prop_balanced_journals_keep_ledger_identity(
            postings in prop::collection::vec((0usize..6, 0usize..6, 1i64..1_000_000i64), 1..20)
        ) {
            let mut engine = JournalEngine::with_standard_chart();
            for (debit, credit, cents) in postings {
                let amount = Money::new(Decimal::new(cents, 2));
                let journal = engine.create_journal(
                    JournalInput::new(date(4, 1), "Random")
                        .debit(POSTABLE[debit], amount)
                        .credit(POSTABLE[credit], amount),
                    CreateOptions::auto_post(),
                );
                prop_assert!(journal.is_ok());
            }

            for journal in engine.journals() {
                prop_assert_eq!(journal.debit_total(), journal.credit_total());
            }
            prop_assert_eq!(ledger_net(&engine), Money::ZERO);
        }

        #[test]
        fn prop_unbalanced_journal_never_mutates(
            debit in 1i64..1_000_000i64,
            delta in 1i64..1_000i64,
        ) {
            let mut engine = JournalEngine::with_standard_chart();
            let result = engine.create_journal(
                JournalInput::new(date(4, 1), "Unbalanced")
                    .debit("1120", Money::new(Decimal::new(debit, 2)))
                    .credit("4100", Money::new(Decimal::new(debit + delta, 2))),
                CreateOptions::auto_post(),
            );

            prop_assert!(result.is_err());
            prop_assert_eq!(engine.account_balance("1120").unwrap(), Money::ZERO);
            prop_assert_eq!(engine.account_balance("4100").unwrap(), Money::ZERO);
        }
    }
}
