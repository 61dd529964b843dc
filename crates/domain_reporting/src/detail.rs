//! Income and expense detail listings

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use core_kernel::{JournalId, Money};

/// Which side of the income statement a listing covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetailKind {
    Income,
    Expense,
}

/// One posted line contributing to income or expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailLine {
    pub date: NaiveDate,
    pub journal_id: JournalId,
    pub journal_number: String,
    pub description: String,
    pub account_code: String,
    pub account_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auxiliary_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auxiliary_name: Option<String>,
    pub amount: Money,
}

/// Per-counterparty subtotal inside an account summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuxiliarySummary {
    pub auxiliary_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auxiliary_name: Option<String>,
    pub amount: Money,
    pub count: usize,
}

/// Per-account subtotal of a detail listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailSummary {
    pub account_code: String,
    pub account_name: String,
    pub amount: Money,
    pub count: usize,
    pub by_auxiliary: Vec<AuxiliarySummary>,
}

/// Groups lines by account code, then by auxiliary code
pub fn summarize(lines: &[DetailLine]) -> Vec<DetailSummary> {
    let mut accounts: BTreeMap<&str, DetailSummary> = BTreeMap::new();
    let mut auxiliaries: BTreeMap<(&str, &str), AuxiliarySummary> = BTreeMap::new();

    for line in lines {
        let summary = accounts
            .entry(line.account_code.as_str())
            .or_insert_with(|| DetailSummary {
                account_code: line.account_code.clone(),
                account_name: line.account_name.clone(),
                amount: Money::ZERO,
                count: 0,
                by_auxiliary: Vec::new(),
            });
        summary.amount += line.amount;
        summary.count += 1;

        if let Some(code) = &line.auxiliary_code {
            let auxiliary = auxiliaries
                .entry((line.account_code.as_str(), code.as_str()))
                .or_insert_with(|| AuxiliarySummary {
                    auxiliary_code: code.clone(),
                    auxiliary_name: line.auxiliary_name.clone(),
                    amount: Money::ZERO,
                    count: 0,
                });
            auxiliary.amount += line.amount;
            auxiliary.count += 1;
        }
    }

    for ((account_code, _), auxiliary) in auxiliaries {
        if let Some(summary) = accounts.get_mut(account_code) {
            summary.by_auxiliary.push(auxiliary);
        }
    }

    accounts.into_values().collect()
}
