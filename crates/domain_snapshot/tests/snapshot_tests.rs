//! Behavioural tests for domain_snapshot

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::Money;
use domain_ledger::{
    CreateOptions, JournalDetailInput, JournalEngine, JournalInput, JournalStatus,
};
use domain_reporting::ReportingEngine;
use domain_snapshot::{Snapshot, SnapshotError, UnitOwner, Vendor, SNAPSHOT_VERSION};

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

fn money(amount: Decimal) -> Money {
    Money::new(amount)
}

fn owners() -> Vec<UnitOwner> {
    vec![
        UnitOwner::new("OWN-101", "101", "Sato").with_account("1210"),
        UnitOwner::new("OWN-102", "102", "Suzuki").with_account("1210"),
    ]
}

fn vendors() -> Vec<Vendor> {
    vec![Vendor::new("VND-01", "Clean Co").with_account("2110")]
}

fn populated_engine() -> JournalEngine {
    let mut engine = JournalEngine::with_standard_chart();
    for owner in owners() {
        owner.register(engine.chart_mut()).unwrap();
    }
    for vendor in vendors() {
        vendor.register(engine.chart_mut()).unwrap();
    }

    engine
        .create_journal(
            JournalInput::new(date(4, 1), "April fee")
                .line(JournalDetailInput::debit("1210", money(dec!(15000))).with_auxiliary("OWN-101"))
                .credit("4100", money(dec!(15000))),
            CreateOptions::auto_post(),
        )
        .unwrap();
    engine
        .create_journal(
            JournalInput::new(date(4, 3), "Cleaning invoice")
                .debit("5110", money(dec!(8000)))
                .line(JournalDetailInput::credit("2110", money(dec!(8000))).with_auxiliary("VND-01")),
            CreateOptions::auto_post(),
        )
        .unwrap();
    let draft = engine
        .create_journal(
            JournalInput::new(date(4, 5), "Pending transfer")
                .debit("1130", money(dec!(1000)))
                .credit("1120", money(dec!(1000))),
            CreateOptions::default(),
        )
        .unwrap();
    engine.submit_journal(draft.id).unwrap();
    engine
}

// ============================================================================
// Export Tests
// ============================================================================

mod export_tests {
    use super::*;

    #[test]
    fn test_capture_records_status_and_number() {
        let engine = populated_engine();
        let snapshot = Snapshot::capture(&engine, &owners(), &vendors());

        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.journals.len(), 3);
        assert_eq!(snapshot.journals[0].number, "000001");
        assert_eq!(snapshot.journals[2].status, JournalStatus::Submitted);
    }

    #[test]
    fn test_json_uses_contract_field_names() {
        let engine = populated_engine();
        let json = Snapshot::capture(&engine, &owners(), &vendors()).to_json().unwrap();

        assert!(json.contains("\"exportDate\""));
        assert!(json.contains("\"unitOwners\""));
        assert!(json.contains("\"accountCode\""));
        assert!(json.contains("\"SUBMITTED\""));
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let engine = populated_engine();
        let mut snapshot = Snapshot::capture(&engine, &owners(), &vendors());
        snapshot.version = 2;
        let json = serde_json::to_string(&snapshot).unwrap();

        let result = Snapshot::from_json(&json);
        assert!(matches!(result, Err(SnapshotError::UnsupportedVersion { found: 2, expected: 1 })));
    }

    #[test]
    fn test_garbage_is_a_serialization_error() {
        assert!(matches!(Snapshot::from_json("{not json"), Err(SnapshotError::Serialization(_))));
    }
}

// ============================================================================
// Restore Tests
// ============================================================================

mod restore_tests {
    use super::*;

    #[test]
    fn test_restore_reproduces_ledger() {
        let original = populated_engine();
        let json = Snapshot::capture(&original, &owners(), &vendors()).to_json().unwrap();

        let mut restored = JournalEngine::with_standard_chart();
        let report = Snapshot::from_json(&json).unwrap().restore(&mut restored).unwrap();

        assert!(report.is_complete());
        assert_eq!(report.restored, 3);
        assert_eq!(restored.journals().len(), original.journals().len());
        for account in original.chart().list() {
            assert_eq!(restored.account_balance(&account.code).unwrap(), account.balance());
        }

        let before = ReportingEngine::new(&original).trial_balance();
        let after = ReportingEngine::new(&restored).trial_balance();
        assert_eq!(before.total_debit, after.total_debit);
        assert_eq!(before.total_credit, after.total_credit);

        let owner = restored.chart().get("1210").unwrap().auxiliary_ledger("OWN-101").unwrap();
        assert_eq!(owner.balance(), money(dec!(15000)));
        assert_eq!(restored.journals()[2].status, JournalStatus::Submitted);
    }

    #[test]
    fn test_restore_keeps_numbers_across_gaps() {
        let mut engine = populated_engine();
        let doomed = engine
            .create_journal(
                JournalInput::new(date(4, 6), "Mistake")
                    .debit("1120", money(dec!(1)))
                    .credit("4500", money(dec!(1))),
                CreateOptions::default(),
            )
            .unwrap();
        engine.delete_journal(doomed.id).unwrap();
        engine
            .create_journal(
                JournalInput::new(date(4, 7), "Interest")
                    .debit("1120", money(dec!(3)))
                    .credit("4400", money(dec!(3))),
                CreateOptions::auto_post(),
            )
            .unwrap();

        let snapshot = Snapshot::capture(&engine, &owners(), &vendors());
        let mut restored = JournalEngine::with_standard_chart();
        snapshot.restore(&mut restored).unwrap();

        assert!(restored.journal_by_number("000004").is_none());
        assert!(restored.journal_by_number("000005").is_some());
    }

    #[test]
    fn test_failed_journal_is_isolated() {
        let engine = populated_engine();
        let mut snapshot = Snapshot::capture(&engine, &owners(), &vendors());
        snapshot.journals[0].details[0].account_code = "1999".to_string();

        let mut restored = JournalEngine::with_standard_chart();
        let report = snapshot.restore(&mut restored).unwrap();

        assert!(!report.is_complete());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].number, "000001");
        assert!(!report.failures[0].messages.is_empty());
        assert_eq!(report.restored, 2);
        assert_eq!(restored.account_balance("1210").unwrap(), Money::ZERO);
    }

    #[test]
    fn test_journal_failing_at_post_is_removed() {
        let huge = money(Decimal::from_i128_with_scale(5 * 10i128.pow(28), 0));
        let mut engine = JournalEngine::with_standard_chart();
        engine
            .create_journal(
                JournalInput::new(date(4, 1), "Deposit").debit("1120", huge).credit("2300", huge),
                CreateOptions::auto_post(),
            )
            .unwrap();
        engine
            .create_journal(
                JournalInput::new(date(4, 2), "Second deposit").debit("1300", huge).credit("2300", huge),
                CreateOptions::default(),
            )
            .unwrap();
        let mut snapshot = Snapshot::capture(&engine, &[], &[]);
        snapshot.journals[1].status = JournalStatus::Posted;

        let mut restored = JournalEngine::with_standard_chart();
        let report = snapshot.restore(&mut restored).unwrap();

        assert_eq!(report.restored, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].number, "000002");
        assert_eq!(restored.journals().len(), 1);
        assert!(restored.journal_by_number("000002").is_none());
        assert_eq!(restored.account_balance("1300").unwrap(), Money::ZERO);
    }

    #[test]
    fn test_restore_replaces_existing_state() {
        let mut target = populated_engine();
        let empty = Snapshot::capture(&JournalEngine::with_standard_chart(), &[], &[]);

        empty.restore(&mut target).unwrap();

        assert!(target.journals().is_empty());
        assert_eq!(target.account_balance("1210").unwrap(), Money::ZERO);
        assert!(target.chart().get("1210").unwrap().auxiliary_ledger("OWN-101").is_none());
    }

    #[test]
    fn test_invalid_owner_aborts_before_clearing() {
        let mut target = populated_engine();
        let snapshot = Snapshot::capture(&target, &[UnitOwner::new("", "101", "Sato")], &[]);

        let result = snapshot.restore(&mut target);

        assert!(matches!(result, Err(SnapshotError::InvalidRecord { .. })));
        assert_eq!(target.journals().len(), 3);
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
        fn prop_restore_reproduces_balances(
            postings in prop::collection::vec((0usize..6, 0usize..6, 1i64..1_000_000i64, any::<bool>()), 1..15)
        ) {
            let mut engine = JournalEngine::with_standard_chart();
            for (debit, credit, cents, auto_post) in postings {
                let amount = Money::new(Decimal::new(cents, 2));
                let options = if auto_post { CreateOptions::auto_post() } else { CreateOptions::default() };
                engine
                    .create_journal(
                        JournalInput::new(date(4, 1), "Random")
                            .debit(POSTABLE[debit], amount)
                            .credit(POSTABLE[credit], amount),
                        options,
                    )
                    .unwrap();
            }

            let json = Snapshot::capture(&engine, &[], &[]).to_json().unwrap();
            let mut restored = JournalEngine::with_standard_chart();
            let report = Snapshot::from_json(&json).unwrap().restore(&mut restored).unwrap();

            prop_assert!(report.is_complete());
            prop_assert_eq!(restored.journals().len(), engine.journals().len());
            for code in POSTABLE {
                prop_assert_eq!(restored.account_balance(code).unwrap(), engine.account_balance(code).unwrap());
            }
        }
    }
}
