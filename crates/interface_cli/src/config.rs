//! Report configuration

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;

use domain_ledger::{DivisionCode, LedgerError};

/// Configuration for one reporting run
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Snapshot JSON to restore
    pub snapshot_path: PathBuf,
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Restrict division views to one division
    #[serde(default)]
    pub division: Option<String>,
    /// Run period closing before reporting
    #[serde(default)]
    pub close_period: bool,
    /// Closing date (defaults to today)
    #[serde(default)]
    pub closing_date: Option<NaiveDate>,
    /// First month of the fiscal year
    #[serde(default = "default_fiscal_start_month")]
    pub fiscal_start_month: u32,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_fiscal_start_month() -> u32 {
    4
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("ledger-snapshot.json"),
            log_level: default_log_level(),
            division: None,
            close_period: false,
            closing_date: None,
            fiscal_start_month: default_fiscal_start_month(),
        }
    }
}

impl ReportConfig {
    /// Loads configuration from `LEDGER_`-prefixed environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("snapshot_path", "ledger-snapshot.json")?
            .add_source(config::Environment::with_prefix("LEDGER"))
            .build()?
            .try_deserialize()
    }

    /// The division filter, parsed
    pub fn division_code(&self) -> Result<Option<DivisionCode>, LedgerError> {
        self.division.as_deref().map(str::parse::<DivisionCode>).transpose()
    }
}
