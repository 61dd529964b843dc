//! Pre-built Test Fixtures
//!
//! Engines, periods and counterparty records that tests across the
//! workspace share. Everything is deterministic.

use chrono::NaiveDate;
use core_kernel::{DateRange, Money};
use domain_ledger::{CreateOptions, JournalDetailInput, JournalEngine, JournalInput};
use domain_snapshot::{UnitOwner, Vendor};
use rust_decimal_macros::dec;

/// Fiscal years start in April
pub const FISCAL_START_MONTH: u32 = 4;

/// Engine on the built-in chart with no journals
pub fn standard_engine() -> JournalEngine {
    JournalEngine::with_standard_chart()
}

/// The fiscal year April 2024 to March 2025
pub fn fiscal_year() -> DateRange {
    DateRange::fiscal_year(2024, FISCAL_START_MONTH).unwrap_or_else(|e| panic!("fixture period: {e}"))
}

/// A date inside the fixture fiscal year
pub fn day(month: u32, day: u32) -> NaiveDate {
    let year = if month >= FISCAL_START_MONTH { 2024 } else { 2025 };
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_else(|| panic!("invalid fixture date {month}/{day}"))
}

/// Fixture for counterparty records
pub struct CounterpartyFixtures;

impl CounterpartyFixtures {
    /// Two owners with management and reserve receivables
    pub fn owners() -> Vec<UnitOwner> {
        vec![
            UnitOwner::new("OWN-101", "101", "Sato Hanako")
                .with_contact("sato@example.com")
                .with_account("1210")
                .with_account("1220"),
            UnitOwner::new("OWN-102", "102", "Suzuki Ichiro")
                .with_account("1210")
                .with_account("1220")
                .with_account("1230"),
        ]
    }

    /// One cleaning contractor and one builder
    pub fn vendors() -> Vec<Vendor> {
        vec![
            Vendor::new("VND-CLEAN", "Harbor Cleaning").with_account("2110"),
            Vendor::new("VND-BUILD", "Kita Construction").with_account("2120"),
        ]
    }
}

/// Engine with fixture owners and vendors registered
pub fn engine_with_counterparties() -> JournalEngine {
    let mut engine = standard_engine();
    for owner in CounterpartyFixtures::owners() {
        owner
            .register(engine.chart_mut())
            .unwrap_or_else(|e| panic!("fixture owner: {e}"));
    }
    for vendor in CounterpartyFixtures::vendors() {
        vendor
            .register(engine.chart_mut())
            .unwrap_or_else(|e| panic!("fixture vendor: {e}"));
    }
    engine
}

fn post(engine: &mut JournalEngine, input: JournalInput) {
    engine
        .create_journal(input, CreateOptions::auto_post())
        .unwrap_or_else(|r| panic!("fixture journal rejected: {r}"));
}

/// Engine with one month of typical activity across all three funds
///
/// Management earns 27,000 and spends 8,000; reserve earns 20,000 and
/// spends 1,000 on depreciation; parking earns 3,000.
pub fn engine_with_activity() -> JournalEngine {
    let mut engine = engine_with_counterparties();

    post(
        &mut engine,
        JournalInput::new(day(4, 1), "April management fees")
            .line(JournalDetailInput::debit("1210", Money::new(dec!(15000))).with_auxiliary("OWN-101"))
            .line(JournalDetailInput::debit("1210", Money::new(dec!(12000))).with_auxiliary("OWN-102"))
            .line(JournalDetailInput::credit("4100", Money::new(dec!(15000))).with_auxiliary("OWN-101"))
            .line(JournalDetailInput::credit("4100", Money::new(dec!(12000))).with_auxiliary("OWN-102")),
    );
    post(
        &mut engine,
        JournalInput::new(day(4, 1), "April reserve contributions")
            .line(JournalDetailInput::debit("1220", Money::new(dec!(10000))).with_auxiliary("OWN-101"))
            .line(JournalDetailInput::debit("1220", Money::new(dec!(10000))).with_auxiliary("OWN-102"))
            .credit("4200", Money::new(dec!(20000))),
    );
    post(
        &mut engine,
        JournalInput::new(day(4, 1), "April parking fee")
            .line(JournalDetailInput::debit("1230", Money::new(dec!(3000))).with_auxiliary("OWN-102"))
            .credit("4300", Money::new(dec!(3000))),
    );
    post(
        &mut engine,
        JournalInput::new(day(4, 27), "Collection of management fees")
            .debit("1120", Money::new(dec!(27000)))
            .line(JournalDetailInput::credit("1210", Money::new(dec!(15000))).with_auxiliary("OWN-101"))
            .line(JournalDetailInput::credit("1210", Money::new(dec!(12000))).with_auxiliary("OWN-102")),
    );
    post(
        &mut engine,
        JournalInput::new(day(4, 30), "Cleaning invoice")
            .debit("5110", Money::new(dec!(8000)))
            .line(JournalDetailInput::credit("2110", Money::new(dec!(8000))).with_auxiliary("VND-CLEAN")),
    );
    post(
        &mut engine,
        JournalInput::new(day(4, 30), "Depreciation")
            .debit("5210", Money::new(dec!(1000)))
            .credit("1410", Money::new(dec!(1000))),
    );
    engine
}
