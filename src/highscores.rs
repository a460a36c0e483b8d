//! Personal records
//!
//! Best score and best single-run currency haul, persisted through the
//! key-value store. Records only ever go up.

use serde::{Deserialize, Serialize};

use crate::persistence::{Store, keys, read_u64};

/// Best results so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScores {
    /// Best score
    pub score: u64,
    /// Most currency collected in one run
    pub coins: u64,
}

impl HighScores {
    /// Load records from the store
    pub fn load(store: &dyn Store) -> Self {
        let records = Self {
            score: read_u64(store, keys::HIGH_SCORE),
            coins: read_u64(store, keys::HIGH_COINS),
        };
        log::info!(
            "Records loaded: score {}, coins {}",
            records.score,
            records.coins
        );
        records
    }

    /// Check if a score beats the current record
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.score
    }

    /// Fold a finished run into the records and persist both values.
    /// Returns true if the score record was beaten.
    pub fn submit(&mut self, score: u64, coins: u64, store: &mut dyn Store) -> bool {
        let new_best = self.qualifies(score);
        self.score = self.score.max(score);
        self.coins = self.coins.max(coins);

        store.set_many(&[
            (keys::HIGH_SCORE, self.score.to_string()),
            (keys::HIGH_COINS, self.coins.to_string()),
        ]);

        if new_best {
            log::info!("New high score: {}", self.score);
        }
        new_best
    }
}
