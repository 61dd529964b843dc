//! Reporting run: restore, optionally close, derive reports

use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, instrument, warn};

use core_kernel::DateRange;
use domain_ledger::{ClosingEngine, ClosingReport, DivisionCode, JournalEngine};
use domain_reporting::{BalanceSheet, DetailSummary, IncomeStatement, ReportingEngine, TrialBalance};
use domain_snapshot::{RestoreReport, Snapshot};

use crate::config::ReportConfig;
use crate::error::CliError;

/// Reports for one division
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DivisionReport {
    pub division: DivisionCode,
    pub trial_balance: TrialBalance,
    pub income_statement: IncomeStatement,
    pub balance_sheet: BalanceSheet,
}

/// Everything one run prints
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerReport {
    pub restore: RestoreReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing: Option<ClosingReport>,
    pub trial_balance: TrialBalance,
    pub income_statement: IncomeStatement,
    pub balance_sheet: BalanceSheet,
    pub divisions: Vec<DivisionReport>,
    /// Fiscal year the detail summaries cover
    pub period: DateRange,
    pub income_summary: Vec<DetailSummary>,
    pub expense_summary: Vec<DetailSummary>,
}

/// Reads and parses a snapshot file
pub fn load_snapshot(path: &Path) -> Result<Snapshot, CliError> {
    let json = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Snapshot::from_json(&json)?)
}

/// Restores `snapshot` into a fresh engine and derives the configured reports
#[instrument(skip(snapshot, config), fields(close_period = config.close_period))]
pub fn build_report(snapshot: &Snapshot, config: &ReportConfig) -> Result<LedgerReport, CliError> {
    let division_filter = config.division_code()?;

    let mut engine = JournalEngine::with_standard_chart();
    let restore = snapshot.restore(&mut engine)?;
    if !restore.is_complete() {
        warn!(failed = restore.failures.len(), "some journals could not be restored");
    }

    let report_date = config.closing_date.unwrap_or_else(|| Utc::now().date_naive());
    let period = DateRange::fiscal_year_containing(report_date, config.fiscal_start_month)?;

    let closing = config
        .close_period
        .then(|| ClosingEngine::standard().close_period(&mut engine, report_date));

    let reporting = ReportingEngine::new(&engine);
    let divisions: Vec<DivisionCode> = match division_filter {
        Some(division) => vec![division],
        None => engine.divisions().required().iter().map(|d| d.code).collect(),
    };

    let mut division_reports = Vec::with_capacity(divisions.len());
    for division in divisions {
        division_reports.push(DivisionReport {
            division,
            trial_balance: reporting.division_trial_balance(division)?,
            income_statement: reporting.division_income_statement(division)?,
            balance_sheet: reporting.division_balance_sheet(division)?,
        });
    }

    let report = LedgerReport {
        restore,
        closing,
        trial_balance: reporting.trial_balance(),
        income_statement: reporting.income_statement(),
        balance_sheet: reporting.balance_sheet(),
        divisions: division_reports,
        income_summary: reporting.income_summary(&period, division_filter),
        expense_summary: reporting.expense_summary(&period, division_filter),
        period,
    };
    info!(
        balanced = report.trial_balance.is_balanced,
        divisions = report.divisions.len(),
        "reports derived"
    );
    Ok(report)
}
