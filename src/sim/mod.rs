//! Simulation core
//!
//! All gameplay logic lives here:
//! - One tick per display frame, distances in pixels
//! - Seeded RNG only
//! - No rendering or platform dependencies; storage goes through the
//!   `persistence::Store` port

pub mod particles;
pub mod physics;
pub mod session;
pub mod spawn;
pub mod state;
pub mod tick;

pub use physics::{Body, center_distance, intersects, is_offscreen, speed_for_score};
pub use session::HitOutcome;
pub use spawn::{pick_placement, spawn_due};
pub use state::{
    Collectible, CollectibleKind, GamePhase, GameState, Lives, MAX_PARTICLES, Obstacle,
    ObstacleKind, Particle, Player, Session, SpawnStats,
};
pub use tick::{TickInput, jump, tick};
