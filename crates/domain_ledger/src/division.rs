//! Accounting divisions
//!
//! A condominium association keeps legally segregated funds. Each account may
//! be tagged with the division it belongs to, and movements between divisions
//! are governed by the registry's transfer rules:
//!
//! - the reserve fund never transfers out, whatever the limits say
//! - other divisions are only bound by configured per-target limits

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use core_kernel::Money;
use crate::error::{LedgerError, LedgerResult};

/// Division identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DivisionCode {
    /// General management fund
    Management,
    /// Capital reserve fund for major repairs
    Reserve,
    /// Parking fund
    Parking,
    /// Accounts shared by every fund (common cash, deposits)
    Shared,
}

impl DivisionCode {
    pub const ALL: [DivisionCode; 4] = [
        DivisionCode::Management,
        DivisionCode::Reserve,
        DivisionCode::Parking,
        DivisionCode::Shared,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DivisionCode::Management => "MANAGEMENT",
            DivisionCode::Reserve => "RESERVE",
            DivisionCode::Parking => "PARKING",
            DivisionCode::Shared => "SHARED",
        }
    }

    /// True for segregated funds, false for the shared pseudo-division
    pub fn is_fund(&self) -> bool {
        !matches!(self, DivisionCode::Shared)
    }
}

impl fmt::Display for DivisionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DivisionCode {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MANAGEMENT" | "GENERAL" => Ok(DivisionCode::Management),
            "RESERVE" => Ok(DivisionCode::Reserve),
            "PARKING" => Ok(DivisionCode::Parking),
            "SHARED" | "COMMON" => Ok(DivisionCode::Shared),
            _ => Err(LedgerError::DivisionNotFound(s.to_string())),
        }
    }
}

/// A legally segregated fund
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Division {
    pub code: DivisionCode,
    pub name: String,
    /// Required divisions are closed at period end and receive shared accounts in reports
    pub is_required: bool,
    transfer_limits: BTreeMap<DivisionCode, Money>,
}

impl Division {
    pub fn new(code: DivisionCode, name: impl Into<String>, is_required: bool) -> Self {
        Self {
            code,
            name: name.into(),
            is_required,
            transfer_limits: BTreeMap::new(),
        }
    }

    /// Configured outbound limit toward `to`, if any
    pub fn transfer_limit(&self, to: DivisionCode) -> Option<Money> {
        self.transfer_limits.get(&to).copied()
    }
}

/// Registry of divisions and their transfer rules
#[derive(Debug, Clone, Default)]
pub struct DivisionRegistry {
    divisions: BTreeMap<DivisionCode, Division>,
}

impl DivisionRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry seeded with the fixed division set
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.initialize();
        registry
    }

    /// Replaces the contents with the fixed division set
    pub fn initialize(&mut self) {
        self.divisions.clear();
        for division in [
            Division::new(DivisionCode::Management, "Management fund", true),
            Division::new(DivisionCode::Reserve, "Capital reserve fund", true),
            Division::new(DivisionCode::Parking, "Parking fund", true),
            Division::new(DivisionCode::Shared, "Shared", false),
        ] {
            self.divisions.insert(division.code, division);
        }
    }

    /// Looks up a division
    pub fn get(&self, code: DivisionCode) -> LedgerResult<&Division> {
        self.divisions
            .get(&code)
            .ok_or_else(|| LedgerError::DivisionNotFound(code.to_string()))
    }

    /// All divisions, ordered by code
    pub fn list(&self) -> Vec<&Division> {
        self.divisions.values().collect()
    }

    /// Divisions flagged as required
    pub fn required(&self) -> Vec<&Division> {
        self.divisions.values().filter(|d| d.is_required).collect()
    }

    pub fn clear(&mut self) {
        self.divisions.clear();
    }

    /// Sets the maximum single transfer from `from` to `to`
    pub fn set_transfer_limit(
        &mut self,
        from: DivisionCode,
        to: DivisionCode,
        limit: Money,
    ) -> LedgerResult<()> {
        self.get(to)?;
        let division = self
            .divisions
            .get_mut(&from)
            .ok_or_else(|| LedgerError::DivisionNotFound(from.to_string()))?;
        division.transfer_limits.insert(to, limit);
        Ok(())
    }

    /// Checks a transfer and explains a refusal
    pub fn check_transfer(
        &self,
        from: DivisionCode,
        to: DivisionCode,
        amount: Money,
    ) -> LedgerResult<()> {
        if from == to {
            return Ok(());
        }
        let source = self.get(from)?;
        self.get(to)?;

        if from == DivisionCode::Reserve {
            return Err(LedgerError::TransferNotPermitted { from, to });
        }

        match source.transfer_limit(to) {
            Some(limit) if amount > limit => Err(LedgerError::TransferLimitExceeded {
                from,
                to,
                amount,
                limit,
            }),
            _ => Ok(()),
        }
    }

    /// Whether `amount` may move from `from` to `to`
    pub fn can_transfer_to(&self, from: DivisionCode, to: DivisionCode, amount: Money) -> bool {
        self.check_transfer(from, to, amount).is_ok()
    }
}
