//! Data-driven game balance
//!
//! Every numeric constant the simulation reads lives here so a balance pass
//! never needs a rebuild. Loaded from LocalStorage on web and from a JSON file
//! natively; anything missing falls back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::economy::PowerKind;

/// Player physics and world geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Downward acceleration (pixels/frame²)
    pub gravity: f32,
    /// Upward velocity applied on jump (pixels/frame, positive = up)
    pub jump_impulse: f32,
    /// Y coordinate of the ground line (screen space, y grows downward)
    pub ground_level: f32,
    /// Visible world width; spawning happens at the right edge
    pub viewport_width: f32,
    /// Fixed screen-space x of the player
    pub player_x: f32,
    pub player_width: f32,
    pub player_height: f32,
    /// Starting world-scroll speed (pixels/frame)
    pub base_speed: f32,
    /// Speed added per point of score
    pub speed_ramp: f32,
    /// Scroll speed ceiling
    pub max_speed: f32,
    /// How far past the left edge an entity may scroll before it is culled
    pub offscreen_margin: f32,
    /// Length of the invulnerability window after losing a life
    pub invulnerability_ms: f64,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: 0.8,
            jump_impulse: 16.0,
            ground_level: 350.0,
            viewport_width: 800.0,
            player_x: 100.0,
            player_width: 50.0,
            player_height: 50.0,
            base_speed: 4.0,
            speed_ramp: 0.003,
            max_speed: 16.0,
            offscreen_margin: 100.0,
            invulnerability_ms: 2000.0,
        }
    }
}

/// One row of the collectible placement table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Horizontal offset from the paired obstacle's left edge
    pub x_offset: f32,
    /// Gap between the ground line and the collectible's bottom edge
    pub lift: f32,
    /// Difficulty tier (0 = easiest)
    pub tier: u8,
    /// Relative selection weight (0 = never picked)
    pub weight: f32,
}

/// Obstacle/collectible spawner settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    pub obstacle_width: f32,
    pub obstacle_height: f32,
    /// Gap between one obstacle's right edge and the next one's left edge
    pub gap: f32,
    pub collectible_width: f32,
    pub collectible_height: f32,
    /// Where the first pair appears, relative to the right viewport edge
    pub first_spawn_offset: f32,
    pub placements: Vec<Placement>,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        // Hardest two tiers are disabled; their rows are kept so the table can
        // be re-balanced from config without code changes.
        let rows = [
            (0.0, 70.0, 0, 0.45),
            (20.0, 90.0, 1, 0.30),
            (40.0, 110.0, 2, 0.15),
            (60.0, 130.0, 3, 0.05),
            (80.0, 150.0, 4, 0.03),
            (100.0, 170.0, 5, 0.02),
            (120.0, 190.0, 6, 0.0),
            (140.0, 205.0, 7, 0.0),
        ];
        Self {
            obstacle_width: 60.0,
            obstacle_height: 60.0,
            gap: 200.0,
            collectible_width: 65.0,
            collectible_height: 65.0,
            first_spawn_offset: 0.0,
            placements: rows
                .iter()
                .map(|&(x_offset, lift, tier, weight)| Placement {
                    x_offset,
                    lift,
                    tier,
                    weight,
                })
                .collect(),
        }
    }
}

impl SpawnTuning {
    /// Distance between consecutive obstacles' left edges
    pub fn spacing(&self) -> f32 {
        self.obstacle_width + self.gap
    }

    /// Sum of all placement weights
    pub fn total_weight(&self) -> f32 {
        self.placements.iter().map(|p| p.weight.max(0.0)).sum()
    }
}

/// Catalog entry for one purchasable power
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerSpec {
    pub kind: PowerKind,
    /// Price in currency
    pub cost: u64,
    /// Active time in seconds (`SESSION_DURATION_SECS` = the whole run, 0 = no timer)
    pub duration_secs: u32,
    /// Uses granted per purchase
    pub uses_per_purchase: u32,
}

/// Duration sentinel meaning "lasts the entire session"
pub const SESSION_DURATION_SECS: u32 = 999;

/// Currency, rewards and the power catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyTuning {
    /// Base currency value of one collectible
    pub coin_value: u64,
    /// Score awarded per currency unit collected
    pub coin_score_bonus: u64,
    /// Currency per exchange unit
    pub exchange_rate: u64,
    /// Premium currency credited per exchange unit
    pub premium_per_unit: u64,
    /// Radius of the magnet pull (pixels, centre to centre)
    pub magnet_range: f32,
    /// Lives granted by the extra-lives power
    pub extra_lives: u8,
    pub powers: Vec<PowerSpec>,
}

impl Default for EconomyTuning {
    fn default() -> Self {
        Self {
            coin_value: 1,
            coin_score_bonus: 10,
            exchange_rate: 1000,
            premium_per_unit: 100,
            magnet_range: 150.0,
            extra_lives: 3,
            powers: vec![
                PowerSpec {
                    kind: PowerKind::Magnet,
                    cost: 300,
                    duration_secs: 30,
                    uses_per_purchase: 3,
                },
                PowerSpec {
                    kind: PowerKind::DoubleCoins,
                    cost: 500,
                    duration_secs: 30,
                    uses_per_purchase: 3,
                },
                PowerSpec {
                    kind: PowerKind::ExtraLives,
                    cost: 1000,
                    duration_secs: SESSION_DURATION_SECS,
                    uses_per_purchase: 1,
                },
            ],
        }
    }
}

impl EconomyTuning {
    /// Look up a power's catalog entry
    pub fn power(&self, kind: PowerKind) -> Option<&PowerSpec> {
        self.powers.iter().find(|p| p.kind == kind)
    }
}

/// Complete tuning set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    pub spawn: SpawnTuning,
    pub economy: EconomyTuning,
}

impl Tuning {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "bone_runner_tuning";

    /// Environment variable naming the native config file
    pub const PATH_ENV: &'static str = "BONE_RUNNER_TUNING";

    /// Parse tuning from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Tuning>(json).map(Tuning::validated)
    }

    /// Clamp values that would break the simulation
    pub fn validated(mut self) -> Self {
        let p = &mut self.physics;
        p.gravity = p.gravity.max(0.0);
        p.jump_impulse = p.jump_impulse.max(0.0);
        p.base_speed = p.base_speed.max(0.0);
        p.speed_ramp = p.speed_ramp.max(0.0);
        if p.max_speed < p.base_speed {
            p.max_speed = p.base_speed;
        }
        p.invulnerability_ms = p.invulnerability_ms.max(0.0);

        let s = &mut self.spawn;
        s.gap = s.gap.max(0.0);
        s.obstacle_width = s.obstacle_width.max(1.0);
        if s.placements.is_empty() || s.total_weight() <= 0.0 {
            log::warn!("Placement table has no positive weights, using defaults");
            s.placements = SpawnTuning::default().placements;
        }

        let e = &mut self.economy;
        e.exchange_rate = e.exchange_rate.max(1);
        e.extra_lives = e.extra_lives.max(1);
        self
    }

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Failed to parse stored tuning: {e}, using defaults"),
                }
            }
        }

        Self::default()
    }

    /// Load tuning from the file named by `BONE_RUNNER_TUNING`
    /// (default `config/tuning.json`). Falls back to defaults if the file is
    /// missing or unparseable.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let path =
            std::env::var(Self::PATH_ENV).unwrap_or_else(|_| "config/tuning.json".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_json(&content) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {path}");
                    tuning
                }
                Err(e) => {
                    log::warn!("Failed to parse {path}: {e}, using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}
