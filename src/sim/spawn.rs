//! Procedural obstacle/collectible spawner
//!
//! Pairs are placed on a world-space cursor that advances by a fixed spacing,
//! so the gap between consecutive obstacles never varies. Each obstacle gets
//! exactly one collectible, placed from a weighted table of heights.

use rand::Rng;

use super::physics::Body;
use super::state::{Collectible, CollectibleKind, GameState, Obstacle, ObstacleKind};
use crate::tuning::{Placement, Tuning};

/// Pick a placement index by cumulative-weight sampling.
///
/// Rows with weight 0 are never chosen. Returns `None` only when no row has a
/// positive weight.
pub fn pick_placement(rng: &mut impl Rng, placements: &[Placement]) -> Option<usize> {
    let total: f32 = placements.iter().map(|p| p.weight.max(0.0)).sum();
    if total <= 0.0 {
        return None;
    }

    let roll = rng.random::<f32>() * total;
    let mut cumulative = 0.0;
    let mut last_positive = None;
    for (i, p) in placements.iter().enumerate() {
        if p.weight <= 0.0 {
            continue;
        }
        cumulative += p.weight;
        last_positive = Some(i);
        if roll < cumulative {
            return Some(i);
        }
    }
    // Float rounding can leave roll a hair above the final sum
    last_positive
}

/// Spawn every pair whose cursor position has entered the viewport.
/// Returns how many pairs were created.
pub fn spawn_due(state: &mut GameState, tuning: &Tuning) -> usize {
    let right_edge = state.world_offset + tuning.physics.viewport_width;
    let mut spawned = 0;
    while right_edge >= state.next_spawn_x {
        spawn_pair(state, tuning);
        state.next_spawn_x += tuning.spawn.spacing();
        spawned += 1;
    }
    spawned
}

/// Place one obstacle at the cursor and its paired collectible
fn spawn_pair(state: &mut GameState, tuning: &Tuning) {
    let spawn = &tuning.spawn;
    let ground = tuning.physics.ground_level;
    // Screen x of the cursor; every live entity satisfies x = world_x - offset
    let x = state.next_spawn_x - state.world_offset;

    let kind = ObstacleKind::ALL[state.rng.random_range(0..ObstacleKind::ALL.len())];
    let id = state.next_entity_id();
    state.obstacles.push(Obstacle {
        id,
        kind,
        body: Body::new(
            x,
            ground - spawn.obstacle_height,
            spawn.obstacle_width,
            spawn.obstacle_height,
        ),
        rotation: 0.0,
        rotation_speed: 0.0,
    });
    state.stats.obstacles += 1;

    // validated() guarantees a positive weight; fall back to the first row anyway
    let index = pick_placement(&mut state.rng, &spawn.placements).unwrap_or(0);
    let Some(placement) = spawn.placements.get(index).copied() else {
        log::warn!("Empty placement table, obstacle {id} has no collectible");
        return;
    };

    let id = state.next_entity_id();
    state.collectibles.push(Collectible {
        id,
        kind: CollectibleKind::Coin,
        body: Body::new(
            x + placement.x_offset,
            ground - placement.lift - spawn.collectible_height,
            spawn.collectible_width,
            spawn.collectible_height,
        ),
        collected: false,
        float_phase: 0.0,
        value: tuning.economy.coin_value,
        magnetized: false,
        tier: placement.tier,
    });
    state.stats.collectibles += 1;
    if let Some(count) = state.stats.tiers.get_mut(index) {
        *count += 1;
    }

    log::debug!(
        "Spawned {:?} at world x {} with tier {} collectible",
        kind,
        state.next_spawn_x,
        placement.tier
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::tuning::SpawnTuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_zero_weight_rows_never_picked() {
        let placements = SpawnTuning::default().placements;
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..20_000 {
            let i = pick_placement(&mut rng, &placements).unwrap();
            assert!(placements[i].weight > 0.0);
        }
    }

    #[test]
    fn test_distribution_matches_weights() {
        let placements = SpawnTuning::default().placements;
        let mut rng = Pcg32::seed_from_u64(2024);
        let n = 100_000;
        let mut counts = vec![0u32; placements.len()];
        for _ in 0..n {
            counts[pick_placement(&mut rng, &placements).unwrap()] += 1;
        }
        for (row, &count) in placements.iter().zip(&counts) {
            let observed = count as f32 / n as f32;
            assert!(
                (observed - row.weight).abs() < 0.01,
                "tier {} observed {observed}, expected {}",
                row.tier,
                row.weight
            );
        }
    }

    #[test]
    fn test_no_positive_weight_picks_nothing() {
        let mut placements = SpawnTuning::default().placements;
        for p in &mut placements {
            p.weight = 0.0;
        }
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(pick_placement(&mut rng, &placements), None);
    }

    #[test]
    fn test_spawn_pairs_each_obstacle() {
        let tuning = Tuning::default();
        let mut state = GameState::load(5, &tuning, &MemoryStore::new());
        state.reset_run(5, &tuning);

        // Scroll far enough for several pairs at once
        state.world_offset = 1000.0;
        let spawned = spawn_due(&mut state, &tuning);
        assert!(spawned >= 4);
        assert_eq!(state.obstacles.len(), spawned);
        assert_eq!(state.collectibles.len(), spawned);
        assert_eq!(state.stats.obstacles, state.stats.collectibles);
        assert_eq!(state.stats.tiers.iter().sum::<u64>(), spawned as u64);

        let spacing = tuning.spawn.spacing();
        for pair in state.obstacles.windows(2) {
            assert!((pair[1].body.pos.x - pair[0].body.pos.x - spacing).abs() < 1e-3);
        }
        // Cursor is past the right edge again
        assert!(state.next_spawn_x > state.world_offset + tuning.physics.viewport_width);
    }

    #[test]
    fn test_spawned_entities_sit_where_expected() {
        let tuning = Tuning::default();
        let mut state = GameState::load(5, &tuning, &MemoryStore::new());
        state.reset_run(5, &tuning);
        assert_eq!(spawn_due(&mut state, &tuning), 1);

        let ground = tuning.physics.ground_level;
        let obstacle = &state.obstacles[0];
        assert_eq!(obstacle.body.bottom(), ground);
        assert_eq!(obstacle.body.width, 60.0);
        assert_eq!(obstacle.body.height, 60.0);
        assert_eq!(obstacle.rotation_speed, 0.0);

        let coin = &state.collectibles[0];
        assert_eq!(coin.body.width, 65.0);
        assert!(coin.body.bottom() < ground, "collectible must be airborne");
        assert!(!coin.collected);
    }

    #[test]
    fn test_zero_weight_tiers_stay_empty_in_stats() {
        let tuning = Tuning::default();
        let mut state = GameState::load(8, &tuning, &MemoryStore::new());
        state.reset_run(8, &tuning);
        state.world_offset = 200_000.0;
        spawn_due(&mut state, &tuning);

        assert!(state.stats.collectibles > 500);
        for (row, &count) in tuning.spawn.placements.iter().zip(&state.stats.tiers) {
            if row.weight == 0.0 {
                assert_eq!(count, 0, "tier {} spawned", row.tier);
            }
        }
    }
}
