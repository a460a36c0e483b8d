//! Cosmetic particle bursts
//!
//! Particles never affect gameplay. They are spawned by events (jump, pickup,
//! hit, game over) and counted down one frame at a time.

use glam::Vec2;
use rand::Rng;

use super::state::{MAX_PARTICLES, Particle};

pub const COLOR_DUST: u32 = 0xC8B090;
pub const COLOR_BONE: u32 = 0xF5E6C8;
pub const COLOR_MAGNET: u32 = 0x9B59B6;
pub const COLOR_GOLD: u32 = 0xFFD700;
pub const COLOR_DAMAGE: u32 = 0xE74C3C;
pub const COLOR_EXPLOSION: u32 = 0xFF7F27;

/// Downward pull on particles (pixels/frame²)
const PARTICLE_GRAVITY: f32 = 0.2;

/// Which effect to spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Burst {
    /// Dust kicked up at take-off
    Jump,
    /// Plain pickup
    Collect,
    /// Pickup while the magnet is active
    CollectMagnet,
    /// Pickup while double coins is active
    CollectDouble,
    /// Lost a life
    Damage,
    /// Run over
    Explosion,
}

impl Burst {
    /// (count, color, speed, life in frames, size)
    fn shape(self) -> (usize, u32, f32, u32, f32) {
        match self {
            Burst::Jump => (6, COLOR_DUST, 2.0, 20, 3.0),
            Burst::Collect => (8, COLOR_BONE, 3.0, 30, 4.0),
            Burst::CollectMagnet => (10, COLOR_MAGNET, 3.5, 30, 4.0),
            Burst::CollectDouble => (12, COLOR_GOLD, 4.0, 35, 5.0),
            Burst::Damage => (15, COLOR_DAMAGE, 5.0, 40, 4.0),
            Burst::Explosion => (30, COLOR_EXPLOSION, 7.0, 60, 6.0),
        }
    }

    pub fn count(self) -> usize {
        self.shape().0
    }

    pub fn color(self) -> u32 {
        self.shape().1
    }
}

/// Spawn a burst around `origin`, dropping the oldest particles past the cap
pub fn emit(particles: &mut Vec<Particle>, rng: &mut impl Rng, burst: Burst, origin: Vec2) {
    let (count, color, speed, life, size) = burst.shape();
    for _ in 0..count {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let magnitude = speed * rng.random_range(0.4..1.0f32);
        let particle_life = life / 2 + rng.random_range(0..=life / 2);
        particles.push(Particle {
            pos: origin,
            vel: Vec2::new(angle.cos(), angle.sin()) * magnitude,
            life: particle_life,
            max_life: particle_life,
            color,
            size: size * rng.random_range(0.6..1.0f32),
        });
    }

    if particles.len() > MAX_PARTICLES {
        let excess = particles.len() - MAX_PARTICLES;
        particles.drain(..excess);
    }
}

/// Advance every particle one frame and drop the dead ones
pub fn update(particles: &mut Vec<Particle>) {
    for p in particles.iter_mut() {
        p.pos += p.vel;
        p.vel.y += PARTICLE_GRAVITY;
        p.life = p.life.saturating_sub(1);
    }
    particles.retain(|p| p.life > 0);
}
