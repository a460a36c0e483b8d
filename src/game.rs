//! Frame driver facade
//!
//! [`Game`] owns the state, the tuning and the store, and is the only thing
//! the platform layer talks to: two input actions, the shop operations, one
//! call per display frame, and the two interval timers.

use serde::Serialize;

use crate::economy::{ExchangeOutcome, PowerKind, Wallet};
use crate::highscores::HighScores;
use crate::persistence::Store;
use crate::sim::{
    Collectible, GamePhase, GameState, Lives, Obstacle, Particle, Player, Session, TickInput,
    jump, tick,
};
use crate::tuning::Tuning;

/// Expiry sweep period
pub const EXPIRY_SWEEP_MS: f64 = 1000.0;
/// Cosmetic animation counter period
pub const ANIMATION_TICK_MS: f64 = 16.0;

/// What the primary action ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryOutcome {
    Jumped,
    Started,
    /// Airborne, or the shop is open
    Ignored,
}

/// One game session with its persistence backend
pub struct Game<S: Store> {
    state: GameState,
    tuning: Tuning,
    store: S,
    shop_open: bool,
    autopilot: bool,
    base_seed: u64,
    runs: u64,
}

impl<S: Store> Game<S> {
    pub fn new(tuning: Tuning, store: S, seed: u64) -> Self {
        let state = GameState::load(seed, &tuning, &store);
        Self {
            state,
            tuning,
            store,
            shop_open: false,
            autopilot: false,
            base_seed: seed,
            runs: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_shop_open(&self) -> bool {
        self.shop_open
    }

    pub fn set_autopilot(&mut self, on: bool) {
        self.autopilot = on;
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    /// Jump while playing; otherwise start a run unless the shop is open
    pub fn primary_action(&mut self, now_ms: f64) -> PrimaryOutcome {
        if self.state.is_playing() {
            return if jump(&mut self.state, &self.tuning) {
                PrimaryOutcome::Jumped
            } else {
                PrimaryOutcome::Ignored
            };
        }
        if self.shop_open {
            return PrimaryOutcome::Ignored;
        }

        self.runs += 1;
        let seed = self
            .base_seed
            .wrapping_add(self.runs.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        self.state
            .start_new_game(seed, now_ms, &self.tuning, &mut self.store);
        PrimaryOutcome::Started
    }

    /// Open or close the shop. Ignored while playing. Returns whether the
    /// shop is open afterwards.
    pub fn toggle_shop(&mut self) -> bool {
        if self.state.is_playing() {
            return self.shop_open;
        }
        self.shop_open = !self.shop_open;
        if self.shop_open && self.state.is_game_over() {
            self.state.phase = GamePhase::Idle;
        }
        self.shop_open
    }

    /// Buy uses of a power; a successful purchase closes the shop
    pub fn buy_power(&mut self, kind: PowerKind) -> bool {
        let bought = self
            .state
            .economy
            .buy_power(kind, &self.tuning.economy, &mut self.store);
        if bought {
            self.shop_open = false;
        }
        bought
    }

    /// Activate a power by hand
    pub fn use_power(&mut self, kind: PowerKind, now_ms: f64) -> bool {
        self.state
            .activate_power(kind, now_ms, &self.tuning, &mut self.store)
    }

    pub fn exchange(&mut self) -> ExchangeOutcome {
        self.state
            .economy
            .exchange(&self.tuning.economy, &mut self.store)
    }

    /// Run one display frame. Returns whether another frame should be
    /// scheduled.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        let input = TickInput {
            now_ms,
            jump: false,
            autopilot: self.autopilot,
        };
        tick(&mut self.state, &input, &self.tuning, &mut self.store);
        self.state.is_playing()
    }

    /// Once-per-second power expiry
    pub fn expiry_sweep(&mut self, now_ms: f64) -> Vec<PowerKind> {
        self.state.sweep_powers(now_ms)
    }

    /// Cosmetic animation counter
    pub fn animation_tick(&mut self) {
        self.state.anim_frame = self.state.anim_frame.wrapping_add(1);
    }

    /// Read-only snapshot for the renderer
    pub fn view(&self, now_ms: f64) -> FrameView<'_> {
        let state = &self.state;
        FrameView {
            phase: state.phase,
            player: &state.player,
            obstacles: &state.obstacles,
            collectibles: &state.collectibles,
            particles: &state.particles,
            world_offset: state.world_offset,
            speed: state.speed,
            session: state.session,
            records: state.records,
            wallet: state.economy.wallet,
            powers: PowerKind::ALL
                .into_iter()
                .map(|kind| PowerView {
                    kind,
                    uses: state.economy.inventory.uses(kind),
                    active: state.economy.is_active(kind, now_ms),
                    remaining_secs: state.economy.active.remaining_secs(kind, now_ms),
                })
                .collect(),
            lives: state.lives,
            invulnerable: state.lives.is_invulnerable(now_ms),
            shop_open: self.shop_open,
            anim_frame: state.anim_frame,
        }
    }
}

/// Power status for the HUD and shop
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerView {
    pub kind: PowerKind,
    pub uses: u32,
    pub active: bool,
    pub remaining_secs: f64,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Serialize)]
pub struct FrameView<'a> {
    pub phase: GamePhase,
    pub player: &'a Player,
    pub obstacles: &'a [Obstacle],
    pub collectibles: &'a [Collectible],
    pub particles: &'a [Particle],
    pub world_offset: f32,
    pub speed: f32,
    pub session: Session,
    pub records: HighScores,
    pub wallet: Wallet,
    pub powers: Vec<PowerView>,
    pub lives: Lives,
    pub invulnerable: bool,
    pub shop_open: bool,
    pub anim_frame: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, keys, read_u64, write_u64};

    fn game_with_currency(currency: u64) -> Game<MemoryStore> {
        let mut store = MemoryStore::new();
        write_u64(&mut store, keys::TOTAL_CURRENCY, currency);
        Game::new(Tuning::default(), store, 99)
    }

    #[test]
    fn test_primary_action_starts_then_jumps() {
        let mut game = game_with_currency(0);
        assert_eq!(game.state().phase, GamePhase::Idle);
        assert_eq!(game.primary_action(0.0), PrimaryOutcome::Started);
        assert!(game.state().is_playing());
        assert_eq!(game.primary_action(16.0), PrimaryOutcome::Jumped);
        assert_eq!(game.primary_action(32.0), PrimaryOutcome::Ignored);
    }

    #[test]
    fn test_shop_blocks_start_and_is_locked_while_playing() {
        let mut game = game_with_currency(0);
        assert!(game.toggle_shop());
        assert_eq!(game.primary_action(0.0), PrimaryOutcome::Ignored);
        assert!(!game.toggle_shop());
        assert_eq!(game.primary_action(0.0), PrimaryOutcome::Started);
        assert!(!game.toggle_shop());
        assert!(!game.is_shop_open());
    }

    #[test]
    fn test_purchase_closes_shop() {
        let mut game = game_with_currency(1000);
        game.toggle_shop();
        assert!(game.buy_power(PowerKind::Magnet));
        assert!(!game.is_shop_open());
        assert_eq!(read_u64(game.store(), keys::TOTAL_CURRENCY), 700);
    }

    #[test]
    fn test_failed_purchase_keeps_shop_open() {
        let mut game = game_with_currency(10);
        game.toggle_shop();
        assert!(!game.buy_power(PowerKind::ExtraLives));
        assert!(game.is_shop_open());
    }

    #[test]
    fn test_frame_stops_after_game_over() {
        let mut game = game_with_currency(0);
        assert!(!game.frame(0.0), "idle game must not schedule frames");
        game.primary_action(0.0);

        let mut now = 0.0;
        let mut frames = 0;
        while game.frame(now) {
            now += 16.0;
            frames += 1;
            assert!(frames < 100_000, "runner never crashed");
        }
        assert!(game.state().is_game_over());
        assert!(!game.frame(now + 16.0));
    }

    #[test]
    fn test_game_over_shop_returns_to_idle() {
        let mut game = game_with_currency(0);
        game.primary_action(0.0);
        let mut now = 0.0;
        while game.frame(now) {
            now += 16.0;
        }
        assert!(game.toggle_shop());
        assert_eq!(game.state().phase, GamePhase::Idle);
    }

    #[test]
    fn test_expiry_sweep_and_animation_tick() {
        let mut store = MemoryStore::new();
        write_u64(&mut store, &keys::power_uses(PowerKind::Magnet), 1);
        let mut game = Game::new(Tuning::default(), store, 1);
        game.primary_action(0.0);
        assert!(game.view(1000.0).powers[0].active);

        assert!(game.expiry_sweep(29_000.0).is_empty());
        assert_eq!(game.expiry_sweep(30_000.0), vec![PowerKind::Magnet]);

        game.animation_tick();
        game.animation_tick();
        assert_eq!(game.view(30_000.0).anim_frame, 2);
    }

    #[test]
    fn test_last_use_spent_in_shop_carries_into_run() {
        let mut store = MemoryStore::new();
        write_u64(&mut store, &keys::power_uses(PowerKind::Magnet), 1);
        let mut game = Game::new(Tuning::default(), store, 3);

        assert!(game.use_power(PowerKind::Magnet, 0.0));
        assert!(game.state().economy.is_active(PowerKind::Magnet, 5000.0));
        assert_eq!(game.primary_action(1000.0), PrimaryOutcome::Started);

        assert!(game.state().economy.is_active(PowerKind::Magnet, 5000.0));
        assert_eq!(game.state().economy.inventory.uses(PowerKind::Magnet), 0);
        assert_eq!(read_u64(game.store(), &keys::power_uses(PowerKind::Magnet)), 0);
    }

    #[test]
    fn test_exchange_scenarios() {
        let mut broke = game_with_currency(0);
        let outcome = broke.exchange();
        assert!(!outcome.is_success());
        assert_eq!(outcome.amounts(), (0, 0));
        assert_eq!(broke.state().economy.wallet, Wallet::default());

        let mut saver = game_with_currency(2500);
        assert_eq!(
            saver.exchange(),
            ExchangeOutcome::Exchanged {
                spent: 2000,
                credited: 200
            }
        );
        assert_eq!(read_u64(saver.store(), keys::TOTAL_CURRENCY), 500);
        assert_eq!(read_u64(saver.store(), keys::PREMIUM_CURRENCY), 200);
    }

    #[test]
    fn test_view_serializes() {
        let mut game = game_with_currency(0);
        game.primary_action(0.0);
        game.frame(16.0);
        let json = serde_json::to_value(game.view(16.0)).unwrap();
        assert_eq!(json["phase"], "Playing");
        assert_eq!(json["obstacles"].as_array().map(Vec::len), Some(1));
        assert_eq!(json["powers"].as_array().map(Vec::len), Some(3));
    }
}
