//! Spatial primitives: bodies, overlap, culling, scroll speed
//!
//! Everything is axis-aligned. Screen y grows downward, so "up" is negative y.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::PhysicsTuning;

/// Shape shared by every simulated entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner (pixels)
    pub pos: Vec2,
    /// Pixels per frame
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    pub active: bool,
}

impl Body {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            width,
            height,
            active: true,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width, self.height) * 0.5
    }
}

/// AABB overlap. Edges that merely touch do not count.
pub fn intersects(a: &Body, b: &Body) -> bool {
    a.pos.x < b.right() && a.right() > b.pos.x && a.pos.y < b.bottom() && a.bottom() > b.pos.y
}

/// True once a body has scrolled fully past the left edge plus `margin`
pub fn is_offscreen(body: &Body, margin: f32) -> bool {
    body.right() < -margin
}

/// Euclidean distance between two bodies' centres
pub fn center_distance(a: &Body, b: &Body) -> f32 {
    a.center().distance(b.center())
}

/// Scroll speed for a given score: linear ramp clamped at the ceiling
pub fn speed_for_score(score: u64, physics: &PhysicsTuning) -> f32 {
    (physics.base_speed + score as f32 * physics.speed_ramp).min(physics.max_speed)
}
