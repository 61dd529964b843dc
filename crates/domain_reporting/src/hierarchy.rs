//! Account hierarchy roll-up

use serde::Serialize;

use core_kernel::Money;
use domain_ledger::{AccountType, ChartOfAccounts, NormalBalance};

/// One account with its descendants' balances rolled up
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountNode {
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub normal_balance: NormalBalance,
    /// The account's own signed balance
    pub balance: Money,
    /// Own balance plus descendants, in this account's normal-balance sign
    pub total: Money,
    pub children: Vec<AccountNode>,
}

/// Builds the roll-up tree from the chart's roots
pub fn build(chart: &ChartOfAccounts) -> Vec<AccountNode> {
    chart
        .roots()
        .into_iter()
        .filter_map(|root| node(chart, &root.code))
        .collect()
}

fn node(chart: &ChartOfAccounts, code: &str) -> Option<AccountNode> {
    let account = chart.get(code).ok()?;
    let children: Vec<AccountNode> = account
        .children()
        .iter()
        .filter_map(|child| node(chart, child))
        .collect();

    let total = children.iter().fold(account.balance(), |total, child| {
        if child.normal_balance == account.normal_balance {
            total + child.total
        } else {
            total - child.total
        }
    });

    Some(AccountNode {
        code: account.code.clone(),
        name: account.name.clone(),
        account_type: account.account_type,
        normal_balance: account.normal_balance,
        balance: account.balance(),
        total,
        children,
    })
}
