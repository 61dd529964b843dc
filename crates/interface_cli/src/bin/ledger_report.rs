//! Condominium Ledger - Report Binary
//!
//! Restores a ledger snapshot and prints its reports as JSON on stdout.
//!
//! # Usage
//!
//! ```bash
//! LEDGER_SNAPSHOT_PATH=./snapshot.json cargo run --bin ledger-report
//!
//! # Close the period first and show only the reserve fund
//! LEDGER_SNAPSHOT_PATH=./snapshot.json LEDGER_CLOSE_PERIOD=true \
//!     LEDGER_CLOSING_DATE=2025-03-31 LEDGER_DIVISION=reserve cargo run --bin ledger-report
//! ```
//!
//! # Environment Variables
//!
//! * `LEDGER_SNAPSHOT_PATH` - Snapshot JSON file (default: ledger-snapshot.json)
//! * `LEDGER_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `LEDGER_DIVISION` - Only report this division
//! * `LEDGER_CLOSE_PERIOD` - Run period closing before reporting (default: false)
//! * `LEDGER_CLOSING_DATE` - Closing date, YYYY-MM-DD (default: today)

use anyhow::Context;
use interface_cli::{build_report, load_snapshot, ReportConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = ReportConfig::from_env().context("invalid LEDGER_ configuration")?;
    init_tracing(&config.log_level);

    tracing::info!(snapshot = %config.snapshot_path.display(), "Loading ledger snapshot");
    let snapshot = load_snapshot(&config.snapshot_path)?;

    let report = build_report(&snapshot, &config)?;
    if !report.trial_balance.is_balanced {
        tracing::warn!(difference = %report.trial_balance.difference(), "Trial balance does not balance");
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Initializes the tracing subscriber, writing to stderr so stdout stays JSON.
///
/// # Arguments
///
/// * `log_level` - Fallback filter when `RUST_LOG` is not set
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}
