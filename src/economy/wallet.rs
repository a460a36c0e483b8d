//! Currency balances

use serde::Serialize;

use crate::persistence::{Store, keys, read_u64};

/// Persisted currency balances
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Wallet {
    /// Lifetime collected currency minus spending
    pub total_currency: u64,
    /// Currency bought through the exchange
    pub premium_currency: u64,
}

/// Result of an exchange attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ExchangeOutcome {
    /// Not enough currency for even one unit; nothing changed
    Insufficient,
    Exchanged { spent: u64, credited: u64 },
}

impl ExchangeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExchangeOutcome::Exchanged { .. })
    }

    /// `(spent, credited)`, zero on failure
    pub fn amounts(&self) -> (u64, u64) {
        match *self {
            ExchangeOutcome::Insufficient => (0, 0),
            ExchangeOutcome::Exchanged { spent, credited } => (spent, credited),
        }
    }
}

impl Wallet {
    pub fn load(store: &dyn Store) -> Self {
        Self {
            total_currency: read_u64(store, keys::TOTAL_CURRENCY),
            premium_currency: read_u64(store, keys::PREMIUM_CURRENCY),
        }
    }

    /// Move whole units of `rate` currency into premium currency
    pub fn exchange(&mut self, rate: u64, premium_per_unit: u64) -> ExchangeOutcome {
        let units = self.total_currency / rate.max(1);
        if units == 0 {
            return ExchangeOutcome::Insufficient;
        }

        let spent = units * rate;
        let credited = units.saturating_mul(premium_per_unit);
        self.total_currency -= spent;
        self.premium_currency = self.premium_currency.saturating_add(credited);
        ExchangeOutcome::Exchanged { spent, credited }
    }
}
