//! Power catalog kinds, owned uses, and active timers

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::persistence::{Store, keys, read_u64};

/// Purchasable powers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerKind {
    /// Pulls nearby collectibles in without touching them
    Magnet,
    /// Collectibles are worth twice as much
    DoubleCoins,
    /// Start the run with extra lives
    ExtraLives,
}

impl PowerKind {
    pub const ALL: [PowerKind; 3] = [
        PowerKind::Magnet,
        PowerKind::DoubleCoins,
        PowerKind::ExtraLives,
    ];

    /// Stable identifier used in storage keys
    pub fn id(&self) -> &'static str {
        match self {
            PowerKind::Magnet => "magnet",
            PowerKind::DoubleCoins => "double_coins",
            PowerKind::ExtraLives => "extra_lives",
        }
    }
}

/// Uses remaining per power (persisted)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PowerInventory {
    uses: BTreeMap<PowerKind, u32>,
}

impl PowerInventory {
    pub fn load(store: &dyn Store) -> Self {
        let uses = PowerKind::ALL
            .into_iter()
            .map(|kind| {
                let n = read_u64(store, &keys::power_uses(kind)).min(u64::from(u32::MAX));
                (kind, n as u32)
            })
            .collect();
        Self { uses }
    }

    pub fn uses(&self, kind: PowerKind) -> u32 {
        self.uses.get(&kind).copied().unwrap_or(0)
    }

    /// Add uses, returning the new count
    pub fn add(&mut self, kind: PowerKind, n: u32) -> u32 {
        let entry = self.uses.entry(kind).or_insert(0);
        *entry = entry.saturating_add(n);
        *entry
    }

    /// Consume one use, returning the new count
    pub fn take(&mut self, kind: PowerKind) -> u32 {
        let entry = self.uses.entry(kind).or_insert(0);
        *entry = entry.saturating_sub(1);
        *entry
    }

    /// Powers with at least one use left, in catalog order
    pub fn available(&self) -> Vec<PowerKind> {
        PowerKind::ALL
            .into_iter()
            .filter(|&k| self.uses(k) > 0)
            .collect()
    }
}

/// Active powers and their absolute expiry (ms)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActivePowers {
    expiries: BTreeMap<PowerKind, f64>,
}

impl ActivePowers {
    pub fn insert(&mut self, kind: PowerKind, expires_at_ms: f64) {
        self.expiries.insert(kind, expires_at_ms);
    }

    pub fn expiry(&self, kind: PowerKind) -> Option<f64> {
        self.expiries.get(&kind).copied()
    }

    pub fn is_active(&self, kind: PowerKind, now_ms: f64) -> bool {
        self.expiry(kind).is_some_and(|t| t > now_ms)
    }

    /// Seconds left on a power, 0 if inactive
    pub fn remaining_secs(&self, kind: PowerKind, now_ms: f64) -> f64 {
        self.expiry(kind)
            .map(|t| ((t - now_ms) / 1000.0).max(0.0))
            .unwrap_or(0.0)
    }

    pub fn remove_expired(&mut self, now_ms: f64) -> Vec<PowerKind> {
        let expired: Vec<PowerKind> = self
            .expiries
            .iter()
            .filter(|&(_, &t)| t <= now_ms)
            .map(|(&k, _)| k)
            .collect();
        for kind in &expired {
            self.expiries.remove(kind);
        }
        expired
    }

    pub fn clear(&mut self) {
        self.expiries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.expiries.is_empty()
    }

    pub fn kinds(&self) -> impl Iterator<Item = PowerKind> + '_ {
        self.expiries.keys().copied()
    }
}
