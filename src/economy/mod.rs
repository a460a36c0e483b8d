//! Meta-economy: currency, purchasable powers, exchange
//!
//! Everything here writes through to the [`Store`] on every change, so the
//! persisted values are always the truth. Invalid actions (buying without
//! funds, activating a power with no uses left) are silent no-ops that
//! return `false`.

pub mod powers;
pub mod wallet;

pub use powers::{ActivePowers, PowerInventory, PowerKind};
pub use wallet::{ExchangeOutcome, Wallet};

use serde::Serialize;

use crate::persistence::{Store, keys};
use crate::tuning::EconomyTuning;

/// Persisted balances plus in-session power state
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Economy {
    pub wallet: Wallet,
    pub inventory: PowerInventory,
    pub active: ActivePowers,
}

impl Economy {
    /// Read balances and power uses from the store
    pub fn load(store: &dyn Store) -> Self {
        let economy = Self {
            wallet: Wallet::load(store),
            inventory: PowerInventory::load(store),
            active: ActivePowers::default(),
        };
        log::info!(
            "Economy loaded: {} currency, {} premium",
            economy.wallet.total_currency,
            economy.wallet.premium_currency
        );
        economy
    }

    /// Buy one pack of uses for a power. Returns whether the purchase happened.
    pub fn buy_power(
        &mut self,
        kind: PowerKind,
        tuning: &EconomyTuning,
        store: &mut dyn Store,
    ) -> bool {
        let Some(spec) = tuning.power(kind) else {
            return false;
        };
        if self.wallet.total_currency < spec.cost {
            return false;
        }

        self.wallet.total_currency -= spec.cost;
        let uses = self.inventory.add(kind, spec.uses_per_purchase);
        let uses_key = keys::power_uses(kind);
        store.set_many(&[
            (keys::TOTAL_CURRENCY, self.wallet.total_currency.to_string()),
            (uses_key.as_str(), uses.to_string()),
        ]);

        log::info!(
            "Bought {} for {} ({} uses left)",
            kind.id(),
            spec.cost,
            uses
        );
        true
    }

    /// Spend one use of a power and start its timer.
    /// Returns whether the power was activated.
    pub fn use_power(
        &mut self,
        kind: PowerKind,
        now_ms: f64,
        tuning: &EconomyTuning,
        store: &mut dyn Store,
    ) -> bool {
        if self.inventory.uses(kind) == 0 {
            return false;
        }
        let Some(spec) = tuning.power(kind) else {
            return false;
        };

        if spec.duration_secs > 0 {
            self.active
                .insert(kind, now_ms + f64::from(spec.duration_secs) * 1000.0);
        }
        let uses = self.inventory.take(kind);
        store.set(&keys::power_uses(kind), &uses.to_string());

        log::info!("Activated {} ({} uses left)", kind.id(), uses);
        true
    }

    /// Drop every power whose expiry has passed. Returns the removed kinds.
    pub fn sweep_expired(&mut self, now_ms: f64) -> Vec<PowerKind> {
        let expired = self.active.remove_expired(now_ms);
        for kind in &expired {
            log::info!("{} expired", kind.id());
        }
        expired
    }

    /// Whether a power is in effect right now
    pub fn is_active(&self, kind: PowerKind, now_ms: f64) -> bool {
        self.active.is_active(kind, now_ms)
    }

    /// Add collected currency and persist the new total
    pub fn deposit(&mut self, amount: u64, store: &mut dyn Store) {
        self.wallet.total_currency = self.wallet.total_currency.saturating_add(amount);
        store.set(keys::TOTAL_CURRENCY, &self.wallet.total_currency.to_string());
    }

    /// Convert currency to premium currency at the configured rate
    pub fn exchange(&mut self, tuning: &EconomyTuning, store: &mut dyn Store) -> ExchangeOutcome {
        let outcome = self
            .wallet
            .exchange(tuning.exchange_rate, tuning.premium_per_unit);
        if let ExchangeOutcome::Exchanged { spent, credited } = outcome {
            store.set_many(&[
                (keys::TOTAL_CURRENCY, self.wallet.total_currency.to_string()),
                (
                    keys::PREMIUM_CURRENCY,
                    self.wallet.premium_currency.to_string(),
                ),
            ]);
            log::info!("Exchanged {spent} currency for {credited} premium");
        }
        outcome
    }
}
