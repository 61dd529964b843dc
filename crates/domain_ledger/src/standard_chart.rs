//! Built-in condominium chart of accounts
//!
//! Codes follow the usual grouping: 1xxx assets, 2xxx liabilities, 3xxx net
//! assets, 4xxx revenue, 5xxx expenses. Every fund division carries its own
//! bank account, surplus account and revenue/expense accounts.

use crate::account::{AccountDefinition, AccountType, AuxiliaryKind, NormalBalance};
use crate::closing::SurplusAccountResolver;
use crate::division::DivisionCode;

/// The built-in chart
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardChart;

impl StandardChart {
    pub const MANAGEMENT_SURPLUS: &'static str = "3100";
    pub const RESERVE_SURPLUS: &'static str = "3200";
    pub const PARKING_SURPLUS: &'static str = "3300";

    /// Flat definitions of every built-in account
    pub fn definitions() -> Vec<AccountDefinition> {
        use AccountType::*;
        use DivisionCode::*;

        fn def(code: &str, name: &str, account_type: AccountType) -> AccountDefinition {
            AccountDefinition::new(code, name, account_type)
        }

        vec![
            // Assets
            def("1000", "Assets", Asset).header(),
            def("1100", "Cash and deposits", Asset).header().with_parent("1000"),
            def("1110", "Cash on hand", Asset).with_parent("1100").with_division(Shared),
            def("1120", "Bank account - management fund", Asset).with_parent("1100").with_division(Management),
            def("1130", "Bank account - reserve fund", Asset).with_parent("1100").with_division(Reserve),
            def("1140", "Bank account - parking fund", Asset).with_parent("1100").with_division(Parking),
            def("1200", "Receivables", Asset).header().with_parent("1000"),
            def("1210", "Management fees receivable", Asset)
                .with_parent("1200")
                .with_division(Management)
                .with_auxiliary(AuxiliaryKind::UnitOwner),
            def("1220", "Reserve contributions receivable", Asset)
                .with_parent("1200")
                .with_division(Reserve)
                .with_auxiliary(AuxiliaryKind::UnitOwner),
            def("1230", "Parking fees receivable", Asset)
                .with_parent("1200")
                .with_division(Parking)
                .with_auxiliary(AuxiliaryKind::UnitOwner),
            def("1300", "Prepaid expenses", Asset).with_parent("1000").with_division(Management),
            def("1400", "Building equipment", Asset).with_parent("1000").with_division(Reserve),
            def("1410", "Accumulated depreciation", Asset)
                .with_parent("1000")
                .with_division(Reserve)
                .with_normal_balance(NormalBalance::Credit),
            // Liabilities
            def("2000", "Liabilities", Liability).header(),
            def("2110", "Accounts payable - management", Liability)
                .with_parent("2000")
                .with_division(Management)
                .with_auxiliary(AuxiliaryKind::Vendor),
            def("2120", "Accounts payable - reserve", Liability)
                .with_parent("2000")
                .with_division(Reserve)
                .with_auxiliary(AuxiliaryKind::Vendor),
            def("2200", "Management fees received in advance", Liability)
                .with_parent("2000")
                .with_division(Management)
                .with_auxiliary(AuxiliaryKind::UnitOwner),
            def("2210", "Reserve contributions received in advance", Liability)
                .with_parent("2000")
                .with_division(Reserve)
                .with_auxiliary(AuxiliaryKind::UnitOwner),
            def("2300", "Deposits received", Liability).with_parent("2000").with_division(Shared),
            // Net assets
            def("3000", "Net assets", Equity).header(),
            def(Self::MANAGEMENT_SURPLUS, "Management fund surplus", Equity)
                .with_parent("3000")
                .with_division(Management),
            def(Self::RESERVE_SURPLUS, "Reserve fund surplus", Equity)
                .with_parent("3000")
                .with_division(Reserve),
            def(Self::PARKING_SURPLUS, "Parking fund surplus", Equity)
                .with_parent("3000")
                .with_division(Parking),
            // Revenue
            def("4100", "Management fee income", Revenue).with_division(Management),
            def("4200", "Reserve contribution income", Revenue).with_division(Reserve),
            def("4300", "Parking fee income", Revenue).with_division(Parking),
            def("4400", "Interest income - management", Revenue).with_division(Management),
            def("4410", "Interest income - reserve", Revenue).with_division(Reserve),
            def("4500", "Miscellaneous income", Revenue).with_division(Management),
            // Expenses
            def("5100", "Management company fees", Expense).with_division(Management),
            def("5110", "Cleaning", Expense).with_division(Management),
            def("5120", "Utilities", Expense).with_division(Management),
            def("5130", "Insurance", Expense).with_division(Management),
            def("5140", "Repairs and maintenance", Expense).with_division(Management),
            def("5200", "Major repairs", Expense).with_division(Reserve),
            def("5210", "Depreciation", Expense).with_division(Reserve),
            def("5300", "Parking maintenance", Expense).with_division(Parking),
            def("5900", "Miscellaneous expenses", Expense).with_division(Management),
        ]
    }

    /// Retained-surplus account of a fund division
    pub fn surplus_account(division: DivisionCode) -> Option<&'static str> {
        match division {
            DivisionCode::Management => Some(Self::MANAGEMENT_SURPLUS),
            DivisionCode::Reserve => Some(Self::RESERVE_SURPLUS),
            DivisionCode::Parking => Some(Self::PARKING_SURPLUS),
            DivisionCode::Shared => None,
        }
    }
}

impl SurplusAccountResolver for StandardChart {
    fn surplus_account(&self, division: DivisionCode) -> Option<String> {
        StandardChart::surplus_account(division).map(str::to_string)
    }
}
