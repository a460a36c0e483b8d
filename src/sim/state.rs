//! Game state and core simulation types
//!
//! Everything the frame tick mutates lives in [`GameState`]. The renderer only
//! ever reads it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::physics::Body;
use crate::economy::Economy;
use crate::highscores::HighScores;
use crate::persistence::Store;
use crate::tuning::Tuning;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen / shop, no run yet
    Idle,
    /// Active gameplay
    Playing,
    /// Run ended; waiting for a restart
    GameOver,
}

/// The runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub is_jumping: bool,
    pub is_grounded: bool,
    pub jump_count: u8,
    pub max_jumps: u8,
}

impl Player {
    /// Standing on the ground at the configured x
    pub fn new(tuning: &Tuning) -> Self {
        let p = &tuning.physics;
        Self {
            body: Body::new(
                p.player_x,
                p.ground_level - p.player_height,
                p.player_width,
                p.player_height,
            ),
            is_jumping: false,
            is_grounded: true,
            jump_count: 0,
            max_jumps: 1,
        }
    }

    /// Whether a jump may start this frame
    pub fn can_jump(&self) -> bool {
        self.is_grounded && self.jump_count == 0
    }
}

/// Obstacle variants (purely cosmetic)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Meteorite,
    Rock,
    Flag,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [ObstacleKind::Meteorite, ObstacleKind::Rock, ObstacleKind::Flag];
}

/// Something to jump over
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub body: Body,
    /// Reserved for spinning variants; obstacles are static for now
    pub rotation: f32,
    pub rotation_speed: f32,
}

/// Collectible variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    /// Drawn as a bone
    Coin,
}

/// Something to pick up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub kind: CollectibleKind,
    pub body: Body,
    pub collected: bool,
    /// Bob animation phase (radians), renderer only
    pub float_phase: f32,
    /// Base currency value
    pub value: u64,
    /// Set while the magnet is pulling it in, renderer only
    pub magnetized: bool,
    /// Placement tier it was spawned at
    pub tier: u8,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Frames left
    pub life: u32,
    pub max_life: u32,
    /// 0xRRGGBB
    pub color: u32,
    pub size: f32,
}

impl Particle {
    /// Remaining life in 0..=1, for fading
    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 {
            0.0
        } else {
            self.life as f32 / self.max_life as f32
        }
    }
}

/// Maximum particles
pub const MAX_PARTICLES: usize = 256;

/// Per-run counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub score: u64,
    /// Currency collected this run
    pub coins: u64,
}

/// Lives and the post-hit invulnerability window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lives {
    pub lives: u8,
    pub max_lives: u8,
    /// Absolute time (ms) the current invulnerability window ends
    pub invulnerable_until: Option<f64>,
}

impl Default for Lives {
    fn default() -> Self {
        Self {
            lives: 1,
            max_lives: 1,
            invulnerable_until: None,
        }
    }
}

impl Lives {
    pub fn is_invulnerable(&self, now_ms: f64) -> bool {
        self.invulnerable_until.is_some_and(|t| now_ms < t)
    }

    /// Forget an invulnerability window that has run out
    pub fn refresh(&mut self, now_ms: f64) {
        if self.invulnerable_until.is_some() && !self.is_invulnerable(now_ms) {
            self.invulnerable_until = None;
        }
    }

    /// Set both current and maximum lives
    pub fn set_all(&mut self, n: u8) {
        self.lives = n;
        self.max_lives = n;
    }
}

/// Spawner bookkeeping for the current run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnStats {
    pub obstacles: u64,
    pub collectibles: u64,
    /// Collectibles spawned per placement tier
    pub tiers: Vec<u64>,
}

/// Complete game state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Seed of the current run
    pub seed: u64,
    #[serde(skip)]
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub player: Player,
    /// Active obstacles, oldest (leftmost) first
    pub obstacles: Vec<Obstacle>,
    /// Active collectibles, oldest first
    pub collectibles: Vec<Collectible>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Total distance scrolled this run
    pub world_offset: f32,
    /// Current scroll speed (pixels/frame)
    pub speed: f32,
    /// World-space x of the next obstacle/collectible pair
    pub next_spawn_x: f32,
    pub session: Session,
    pub lives: Lives,
    pub economy: Economy,
    pub records: HighScores,
    pub stats: SpawnStats,
    /// Simulation frames this run
    pub frame: u64,
    /// Cosmetic animation counter, advanced by its own timer
    pub anim_frame: u32,
    next_id: u32,
}

impl GameState {
    /// Idle state with persisted progression loaded from `store`
    pub fn load(seed: u64, tuning: &Tuning, store: &dyn Store) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            player: Player::new(tuning),
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            particles: Vec::new(),
            world_offset: 0.0,
            speed: tuning.physics.base_speed,
            next_spawn_x: first_spawn_x(tuning),
            session: Session::default(),
            lives: Lives::default(),
            economy: Economy::load(store),
            records: HighScores::load(store),
            stats: SpawnStats::default(),
            frame: 0,
            anim_frame: 0,
            next_id: 1,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Clear everything that belongs to a single run
    pub(crate) fn reset_run(&mut self, seed: u64, tuning: &Tuning) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.player = Player::new(tuning);
        self.obstacles.clear();
        self.collectibles.clear();
        self.particles.clear();
        self.world_offset = 0.0;
        self.speed = tuning.physics.base_speed;
        self.next_spawn_x = first_spawn_x(tuning);
        self.session = Session::default();
        self.lives = Lives::default();
        self.stats = SpawnStats {
            tiers: vec![0; tuning.spawn.placements.len()],
            ..SpawnStats::default()
        };
        self.frame = 0;
        self.next_id = 1;
    }
}

/// World-space x of a run's first spawn
fn first_spawn_x(tuning: &Tuning) -> f32 {
    tuning.physics.viewport_width + tuning.spawn.first_spawn_offset
}
