//! Run lifecycle and the rules that tie the simulation to the economy
//!
//! Starting a run, collecting, taking hits, and ending the run all touch both
//! the per-run state and persisted progression, so they live here rather than
//! in the frame tick.

use super::particles::{self, Burst};
use super::state::{GamePhase, GameState};
use crate::economy::PowerKind;
use crate::persistence::Store;
use crate::tuning::Tuning;

/// What a collision with an obstacle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Still invulnerable, nothing happened
    Ignored,
    /// Lost a life, now invulnerable
    LifeLost,
    /// That was the last life
    GameOver,
}

impl GameState {
    /// Reset the run and start playing. Every power with uses left is
    /// activated automatically; powers already running stay active.
    pub fn start_new_game(
        &mut self,
        seed: u64,
        now_ms: f64,
        tuning: &Tuning,
        store: &mut dyn Store,
    ) {
        self.reset_run(seed, tuning);
        self.phase = GamePhase::Playing;
        if self.economy.is_active(PowerKind::ExtraLives, now_ms) {
            self.lives.set_all(tuning.economy.extra_lives);
        }

        for kind in self.economy.inventory.available() {
            self.activate_power(kind, now_ms, tuning, store);
        }

        log::info!(
            "New game (seed {seed}), lives {}/{}",
            self.lives.lives,
            self.lives.max_lives
        );
    }

    /// Spend a use of a power. The extra-lives power takes effect immediately.
    pub fn activate_power(
        &mut self,
        kind: PowerKind,
        now_ms: f64,
        tuning: &Tuning,
        store: &mut dyn Store,
    ) -> bool {
        if !self
            .economy
            .use_power(kind, now_ms, &tuning.economy, store)
        {
            return false;
        }
        if kind == PowerKind::ExtraLives {
            self.lives.set_all(tuning.economy.extra_lives);
        }
        true
    }

    /// Expire timed powers. Losing extra lives drops back to a single life.
    pub fn sweep_powers(&mut self, now_ms: f64) -> Vec<PowerKind> {
        let expired = self.economy.sweep_expired(now_ms);
        if expired.contains(&PowerKind::ExtraLives) {
            self.lives.set_all(1);
        }
        expired
    }

    /// Pick up the collectible at `index`. Returns the currency gained, or
    /// `None` if it was already taken or gone.
    pub fn collect_coin(
        &mut self,
        index: usize,
        now_ms: f64,
        tuning: &Tuning,
        store: &mut dyn Store,
    ) -> Option<u64> {
        let magnet = self.economy.is_active(PowerKind::Magnet, now_ms);
        let double = self.economy.is_active(PowerKind::DoubleCoins, now_ms);

        let item = self.collectibles.get_mut(index)?;
        if item.collected || !item.body.active {
            return None;
        }
        item.collected = true;
        item.body.active = false;
        let origin = item.body.center();
        let value = if double { item.value * 2 } else { item.value };

        self.session.coins += value;
        self.session.score += value * tuning.economy.coin_score_bonus;
        self.economy.deposit(value, store);

        let burst = if magnet {
            Burst::CollectMagnet
        } else if double {
            Burst::CollectDouble
        } else {
            Burst::Collect
        };
        particles::emit(&mut self.particles, &mut self.rng, burst, origin);

        Some(value)
    }

    /// Take a hit from an obstacle
    pub fn lose_life(&mut self, now_ms: f64, tuning: &Tuning, store: &mut dyn Store) -> HitOutcome {
        if self.lives.is_invulnerable(now_ms) {
            return HitOutcome::Ignored;
        }

        if self.lives.lives > 1 {
            self.lives.lives -= 1;
            self.lives.invulnerable_until = Some(now_ms + tuning.physics.invulnerability_ms);
            let origin = self.player.body.center();
            particles::emit(&mut self.particles, &mut self.rng, Burst::Damage, origin);
            log::debug!("Hit! {} lives left", self.lives.lives);
            HitOutcome::LifeLost
        } else {
            self.game_over(store);
            HitOutcome::GameOver
        }
    }

    /// End the run: powers end, lives reset, records persist
    pub fn game_over(&mut self, store: &mut dyn Store) {
        self.economy.active.clear();
        self.lives = Default::default();
        self.records
            .submit(self.session.score, self.session.coins, store);
        self.phase = GamePhase::GameOver;

        let origin = self.player.body.center();
        particles::emit(&mut self.particles, &mut self.rng, Burst::Explosion, origin);

        log::info!(
            "Game over: score {}, coins {} (best {})",
            self.session.score,
            self.session.coins,
            self.records.score
        );
    }
}
