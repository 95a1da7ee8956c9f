//! Player avatar

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::{Bounds, clamp_in_place, wrap_in_place};
use crate::consts::*;

/// The player's dot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing angle (radians); kept from the last non-zero velocity
    pub heading: f32,
    pub hitbox_radius: f32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            heading: 0.0,
            hitbox_radius: PLAYER_HITBOX_RADIUS,
        }
    }

    /// Take the sampled input velocity and integrate one step
    pub fn update(&mut self, dt: f32, input_velocity: Vec2, bounds: Bounds, wrap: bool) {
        self.vel = if input_velocity.is_finite() {
            input_velocity.clamp_length_max(PLAYER_MAX_SPEED)
        } else {
            Vec2::ZERO
        };

        if self.vel != Vec2::ZERO {
            self.heading = self.vel.y.atan2(self.vel.x);
        }

        self.pos += self.vel * dt;

        if wrap {
            wrap_in_place(&mut self.pos, bounds);
        } else {
            clamp_in_place(&mut self.pos, bounds);
        }
    }

    /// Unit vector the player is facing
    pub fn facing(&self) -> Vec2 {
        crate::heading_vector(self.heading)
    }
}
