//! Per-frame simulation tick
//!
//! Core game loop that advances the run by one display frame. All distances
//! are in pixels and all velocities in pixels/frame.

use super::particles::{self, Burst};
use super::physics::{center_distance, intersects, is_offscreen, speed_for_score};
use super::spawn::spawn_due;
use super::state::{GameState, Player};
use crate::economy::PowerKind;
use crate::persistence::Store;
use crate::tuning::{PhysicsTuning, Tuning};

/// Collectible bob animation step (radians/frame)
const FLOAT_PHASE_STEP: f32 = 0.1;

/// How many frames of travel ahead of an obstacle the autopilot takes off
const AUTOPILOT_LEAD_FRAMES: f32 = 6.0;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Wall-clock time of this frame (ms), for power and invulnerability timers
    pub now_ms: f64,
    /// Jump this frame (applied before integration)
    pub jump: bool,
    /// Demo mode - jump automatically in front of obstacles
    pub autopilot: bool,
}

/// Start a jump if the player is standing. Returns whether it happened.
pub fn jump(state: &mut GameState, tuning: &Tuning) -> bool {
    let player = &mut state.player;
    if !player.can_jump() {
        return false;
    }

    player.body.vel.y = -tuning.physics.jump_impulse;
    player.jump_count = 1;
    player.is_jumping = true;
    player.is_grounded = false;

    let feet = player.body.center() + glam::Vec2::new(0.0, player.body.height * 0.5);
    particles::emit(&mut state.particles, &mut state.rng, Burst::Jump, feet);
    true
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, tuning: &Tuning, store: &mut dyn Store) {
    if !state.is_playing() {
        return;
    }
    let now = input.now_ms;
    state.frame += 1;
    state.lives.refresh(now);

    if input.jump || (input.autopilot && autopilot_wants_jump(state)) {
        jump(state, tuning);
    }

    // Difficulty ramps with score
    state.speed = speed_for_score(state.session.score, &tuning.physics);
    state.world_offset += state.speed;

    integrate_player(&mut state.player, &tuning.physics);

    // Scroll first, then spawn, so every entity keeps x = world_x - offset
    advance_entities(state, tuning);
    spawn_due(state, tuning);

    particles::update(&mut state.particles);

    resolve_collisions(state, now, tuning, store);
    if !state.is_playing() {
        return;
    }

    // Survival bonus
    state.session.score += 1;
}

/// Gravity, then the ground
fn integrate_player(player: &mut Player, physics: &PhysicsTuning) {
    player.body.vel.y += physics.gravity;
    player.body.pos.y += player.body.vel.y;

    let ground_y = physics.ground_level - player.body.height;
    if player.body.pos.y >= ground_y {
        player.body.pos.y = ground_y;
        player.body.vel.y = 0.0;
        player.is_grounded = true;
        player.is_jumping = false;
        player.jump_count = 0;
    } else {
        player.is_grounded = false;
    }
}

/// Scroll obstacles and collectibles left and cull the ones that are done
fn advance_entities(state: &mut GameState, tuning: &Tuning) {
    let speed = state.speed;
    let margin = tuning.physics.offscreen_margin;

    for obstacle in &mut state.obstacles {
        obstacle.body.pos.x -= speed;
        obstacle.rotation += obstacle.rotation_speed;
    }
    for item in &mut state.collectibles {
        item.body.pos.x -= speed;
        item.float_phase = (item.float_phase + FLOAT_PHASE_STEP) % std::f32::consts::TAU;
    }

    state
        .obstacles
        .retain(|o| o.body.active && !is_offscreen(&o.body, margin));
    state
        .collectibles
        .retain(|c| c.body.active && !c.collected && !is_offscreen(&c.body, margin));
}

/// Obstacles cost lives; collectibles are picked up by touch or by magnet
fn resolve_collisions(state: &mut GameState, now: f64, tuning: &Tuning, store: &mut dyn Store) {
    let hits = state
        .obstacles
        .iter()
        .filter(|o| o.body.active && intersects(&state.player.body, &o.body))
        .count();
    for _ in 0..hits {
        state.lose_life(now, tuning, store);
        if !state.is_playing() {
            return;
        }
    }

    let magnet = state.economy.is_active(PowerKind::Magnet, now);
    let range = tuning.economy.magnet_range;
    let player = state.player.body;

    // Collect indices first (collect_coin needs the whole state)
    let mut to_collect = Vec::new();
    for (i, item) in state.collectibles.iter_mut().enumerate() {
        if item.collected || !item.body.active {
            continue;
        }
        let caught = if magnet {
            let in_range = center_distance(&player, &item.body) <= range;
            item.magnetized = in_range;
            in_range || intersects(&player, &item.body)
        } else {
            intersects(&player, &item.body)
        };
        if caught {
            to_collect.push(i);
        }
    }
    for i in to_collect {
        state.collect_coin(i, now, tuning, store);
    }
}

/// Take off when the next obstacle is a few frames away
fn autopilot_wants_jump(state: &GameState) -> bool {
    let player = &state.player;
    if !player.can_jump() {
        return false;
    }
    state
        .obstacles
        .iter()
        .filter(|o| o.body.active && o.body.right() > player.body.pos.x)
        .map(|o| o.body.pos.x - player.body.right())
        .fold(None, |nearest: Option<f32>, gap| {
            Some(nearest.map_or(gap, |n| n.min(gap)))
        })
        .is_some_and(|gap| gap >= 0.0 && gap <= state.speed.max(1.0) * AUTOPILOT_LEAD_FRAMES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, keys, read_u64, write_u64};
    use crate::sim::physics::Body;
    use crate::sim::state::{Collectible, CollectibleKind, GamePhase, Obstacle, ObstacleKind};

    fn start(store: &mut MemoryStore) -> (GameState, Tuning) {
        let tuning = Tuning::default();
        let mut state = GameState::load(42, &tuning, &*store);
        state.start_new_game(42, 0.0, &tuning, store);
        (state, tuning)
    }

    fn at(now_ms: f64) -> TickInput {
        TickInput {
            now_ms,
            ..Default::default()
        }
    }

    /// Obstacle that will overlap the player after this frame's scroll
    fn obstacle_on_player(state: &mut GameState, tuning: &Tuning) -> Obstacle {
        let speed = speed_for_score(state.session.score, &tuning.physics);
        Obstacle {
            id: state.next_entity_id(),
            kind: ObstacleKind::Rock,
            body: Body::new(
                tuning.physics.player_x + speed,
                tuning.physics.ground_level - 60.0,
                60.0,
                60.0,
            ),
            rotation: 0.0,
            rotation_speed: 0.0,
        }
    }

    /// Collectible whose centre ends up `dist` pixels straight above the
    /// player's centre after this frame's scroll
    fn coin_above_player(state: &mut GameState, tuning: &Tuning, dist: f32) -> Collectible {
        let speed = speed_for_score(state.session.score, &tuning.physics);
        let center = state.player.body.center() + glam::Vec2::new(speed, -dist);
        Collectible {
            id: state.next_entity_id(),
            kind: CollectibleKind::Coin,
            body: Body::new(center.x - 32.5, center.y - 32.5, 65.0, 65.0),
            collected: false,
            float_phase: 0.0,
            value: 1,
            magnetized: false,
            tier: 0,
        }
    }

    #[test]
    fn test_jump_applies_impulse_once() {
        let mut store = MemoryStore::new();
        let (mut state, tuning) = start(&mut store);
        assert!(state.player.can_jump());

        assert!(jump(&mut state, &tuning));
        assert!(!state.player.is_grounded);
        assert_eq!(state.player.jump_count, 1);
        assert_eq!(state.player.body.vel.y, -tuning.physics.jump_impulse);

        // Airborne: second jump is ignored
        let vel = state.player.body.vel;
        assert!(!jump(&mut state, &tuning));
        assert_eq!(state.player.body.vel, vel);
        assert_eq!(state.player.jump_count, 1);
    }

    #[test]
    fn test_player_lands_and_can_jump_again() {
        let mut store = MemoryStore::new();
        let (mut state, tuning) = start(&mut store);
        state.lives.invulnerable_until = Some(f64::MAX);
        let ground_y = tuning.physics.ground_level - tuning.physics.player_height;

        jump(&mut state, &tuning);
        let mut landed_after = None;
        for frame in 1..100 {
            tick(&mut state, &at(frame as f64 * 16.0), &tuning, &mut store);
            assert!(state.player.jump_count <= state.player.max_jumps);
            if state.player.is_grounded {
                landed_after = Some(frame);
                break;
            }
            assert!(state.player.body.pos.y < ground_y);
        }
        assert!(landed_after.is_some());
        assert_eq!(state.player.body.pos.y, ground_y);
        assert_eq!(state.player.jump_count, 0);
        assert!(state.player.can_jump());
    }

    #[test]
    fn test_tick_is_noop_when_not_playing() {
        let tuning = Tuning::default();
        let mut store = MemoryStore::new();
        let mut state = GameState::load(1, &tuning, &store);
        tick(&mut state, &at(0.0), &tuning, &mut store);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.frame, 0);
        assert_eq!(state.world_offset, 0.0);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_score_and_scroll_advance_each_frame() {
        let mut store = MemoryStore::new();
        let (mut state, tuning) = start(&mut store);
        tick(&mut state, &at(16.0), &tuning, &mut store);
        tick(&mut state, &at(32.0), &tuning, &mut store);
        assert_eq!(state.session.score, 2);
        assert!(state.world_offset > 0.0);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.collectibles.len(), 1);
    }

    #[test]
    fn test_speed_ramps_with_score() {
        let mut store = MemoryStore::new();
        let (mut state, tuning) = start(&mut store);
        state.session.score = 2000;
        state.lives.invulnerable_until = Some(f64::MAX);
        tick(&mut state, &at(16.0), &tuning, &mut store);
        assert!((state.speed - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_offscreen_entities_are_pruned() {
        let mut store = MemoryStore::new();
        let (mut state, tuning) = start(&mut store);
        let mut obstacle = obstacle_on_player(&mut state, &tuning);
        // Right edge at -95, four pixels of scroll per frame
        obstacle.body.pos.x = -155.0;
        state.obstacles.push(obstacle);

        tick(&mut state, &at(16.0), &tuning, &mut store);
        assert!(state.obstacles.iter().any(|o| o.body.pos.x < 0.0));
        tick(&mut state, &at(32.0), &tuning, &mut store);
        assert!(state.obstacles.iter().all(|o| o.body.pos.x >= 0.0));
    }

    #[test]
    fn test_collision_on_last_life_ends_game() {
        let mut store = MemoryStore::new();
        write_u64(&mut store, keys::HIGH_SCORE, 10);
        let (mut state, tuning) = start(&mut store);
        state.session.score = 50;
        let obstacle = obstacle_on_player(&mut state, &tuning);
        state.obstacles.push(obstacle);

        tick(&mut state, &at(16.0), &tuning, &mut store);
        assert!(state.is_game_over());
        assert_eq!(read_u64(&store, keys::HIGH_SCORE), 50);

        // Stopped: further ticks change nothing
        let frame = state.frame;
        tick(&mut state, &at(32.0), &tuning, &mut store);
        assert_eq!(state.frame, frame);
    }

    #[test]
    fn test_collision_below_record_keeps_record() {
        let mut store = MemoryStore::new();
        write_u64(&mut store, keys::HIGH_SCORE, 10_000);
        let (mut state, tuning) = start(&mut store);
        state.session.score = 50;
        let obstacle = obstacle_on_player(&mut state, &tuning);
        state.obstacles.push(obstacle);

        tick(&mut state, &at(16.0), &tuning, &mut store);
        assert!(state.is_game_over());
        assert_eq!(read_u64(&store, keys::HIGH_SCORE), 10_000);
    }

    #[test]
    fn test_hits_respect_invulnerability_window() {
        let mut store = MemoryStore::new();
        let (mut state, tuning) = start(&mut store);
        state.lives.set_all(3);
        let obstacle = obstacle_on_player(&mut state, &tuning);
        state.obstacles.push(obstacle);

        tick(&mut state, &at(0.0), &tuning, &mut store);
        assert_eq!(state.lives.lives, 2);
        assert!(state.lives.is_invulnerable(0.0));

        tick(&mut state, &at(1000.0), &tuning, &mut store);
        assert_eq!(state.lives.lives, 2);

        tick(&mut state, &at(2500.0), &tuning, &mut store);
        assert_eq!(state.lives.lives, 1);
        assert!(state.is_playing());
    }

    #[test]
    fn test_magnet_collects_within_range() {
        let mut store = MemoryStore::new();
        let (mut state, tuning) = start(&mut store);
        state.economy.active.insert(PowerKind::Magnet, 60_000.0);
        let coin = coin_above_player(&mut state, &tuning, 140.0);
        state.collectibles.push(coin);

        tick(&mut state, &at(16.0), &tuning, &mut store);
        assert_eq!(state.session.coins, 1);
        assert_eq!(state.economy.wallet.total_currency, 1);
    }

    #[test]
    fn test_magnet_ignores_out_of_range() {
        let mut store = MemoryStore::new();
        let (mut state, tuning) = start(&mut store);
        state.economy.active.insert(PowerKind::Magnet, 60_000.0);
        let coin = coin_above_player(&mut state, &tuning, 160.0);
        let id = coin.id;
        state.collectibles.push(coin);

        tick(&mut state, &at(16.0), &tuning, &mut store);
        assert_eq!(state.session.coins, 0);
        let coin = state.collectibles.iter().find(|c| c.id == id).unwrap();
        assert!(!coin.collected);
        assert!(!coin.magnetized);
    }

    #[test]
    fn test_no_magnet_needs_contact() {
        let mut store = MemoryStore::new();
        let (mut state, tuning) = start(&mut store);
        let coin = coin_above_player(&mut state, &tuning, 140.0);
        state.collectibles.push(coin);
        tick(&mut state, &at(16.0), &tuning, &mut store);
        assert_eq!(state.session.coins, 0);

        let coin = coin_above_player(&mut state, &tuning, 10.0);
        state.collectibles.push(coin);
        tick(&mut state, &at(32.0), &tuning, &mut store);
        assert_eq!(state.session.coins, 1);
    }

    #[test]
    fn test_autopilot_jumps_before_obstacle() {
        let mut store = MemoryStore::new();
        let (mut state, tuning) = start(&mut store);
        let mut obstacle = obstacle_on_player(&mut state, &tuning);
        obstacle.body.pos.x = state.player.body.right() + 20.0;
        state.obstacles.push(obstacle);

        let input = TickInput {
            now_ms: 16.0,
            autopilot: true,
            ..Default::default()
        };
        tick(&mut state, &input, &tuning, &mut store);
        assert!(!state.player.is_grounded);
        assert_eq!(state.player.jump_count, 1);
    }

    #[test]
    fn test_long_run_keeps_pairs_and_spacing() {
        let mut store = MemoryStore::new();
        let (mut state, tuning) = start(&mut store);
        state.lives.invulnerable_until = Some(f64::MAX);

        for frame in 1..=1500 {
            tick(&mut state, &at(frame as f64 * 16.0), &tuning, &mut store);
        }
        assert!(state.is_playing());
        assert!(state.stats.obstacles > 10);
        assert_eq!(state.stats.obstacles, state.stats.collectibles);

        let spacing = tuning.spawn.spacing();
        for pair in state.obstacles.windows(2) {
            let dx = pair[1].body.pos.x - pair[0].body.pos.x;
            assert!((dx - spacing).abs() < 0.05, "spacing drifted to {dx}");
        }
        for obstacle in &state.obstacles {
            assert_eq!(obstacle.rotation, 0.0);
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn jump_count_stays_in_bounds(
                seed in 0u64..500,
                jumps in proptest::collection::vec(any::<bool>(), 50..200)
            ) {
                let tuning = Tuning::default();
                let mut store = MemoryStore::new();
                let mut state = GameState::load(seed, &tuning, &store);
                state.start_new_game(seed, 0.0, &tuning, &mut store);
                state.lives.invulnerable_until = Some(f64::MAX);

                for (frame, &jump) in jumps.iter().enumerate() {
                    let input = TickInput { now_ms: frame as f64 * 16.0, jump, autopilot: false };
                    tick(&mut state, &input, &tuning, &mut store);
                    prop_assert!(state.player.jump_count <= state.player.max_jumps);
                    prop_assert!(
                        state.player.body.bottom() <= tuning.physics.ground_level + 1e-3
                    );
                }
                prop_assert_eq!(state.stats.obstacles, state.stats.collectibles);
            }
        }
    }
}
