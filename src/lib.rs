//! Dotstorm - dodge hundreds of dots, grab weapons, clear the arena
//!
//! Core modules:
//! - `sim`: Deterministic simulation (hazards, patterns, weapons, collisions)
//! - `settings`: Data-driven tuning loaded from JSON
//! - `error`: Configuration error taxonomy

pub mod error;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Fixed simulation timestep in milliseconds
    pub const SIM_DT_MS: f64 = 1000.0 / 60.0;
    /// Maximum ticks per frame before the backlog is carried to the next frame
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default arena dimensions (portrait phone)
    pub const ARENA_WIDTH: f32 = 400.0;
    pub const ARENA_HEIGHT: f32 = 800.0;

    /// Player defaults - hitbox is half the drawn radius
    pub const PLAYER_VISUAL_RADIUS: f32 = 10.0;
    pub const PLAYER_HITBOX_RADIUS: f32 = PLAYER_VISUAL_RADIUS * 0.5;
    pub const PLAYER_MAX_SPEED: f32 = 800.0;

    /// Hazard defaults
    pub const HAZARD_RADIUS: f32 = 8.0;
    /// Emitter cores are built with twice the normal radius
    pub const CORE_HAZARD_RADIUS: f32 = HAZARD_RADIUS * 2.0;
    pub const SPAWN_ANIMATION_MS: f32 = 1000.0;
    pub const SPAWN_SCALE_MAX: f32 = 1.5;
    /// Frozen hazards thaw after this long
    pub const THAW_DURATION_MS: f32 = 3000.0;
    /// Shaking starts this long before the thaw
    pub const PRE_THAW_WARNING_MS: f32 = 500.0;
    /// Maximum shake amplitude right before the thaw
    pub const THAW_SHAKE_AMPLITUDE: f32 = 2.0;
    /// Frozen hazards carry an ice rim that melts away while frozen
    pub const FROZEN_RIM_MAX: f32 = 8.0;
    /// Chase speed of thawed hazards
    pub const ZOMBIE_SPEED: f32 = 50.0;
    /// Largest collision radius any hazard can report
    pub const MAX_HAZARD_RADIUS: f32 = CORE_HAZARD_RADIUS + FROZEN_RIM_MAX;

    /// Broad-phase cell size. A 3x3 neighbourhood query is exact only while
    /// the largest hazard radius plus the player radius fits in one cell.
    pub const GRID_CELL_SIZE: f32 = 100.0;
    const _: () = assert!(MAX_HAZARD_RADIUS + PLAYER_HITBOX_RADIUS <= GRID_CELL_SIZE);

    /// Weapon pickups
    pub const WEAPON_ORB_RADIUS: f32 = 20.0;
    pub const WEAPON_ORB_COUNT: usize = 3;
    pub const WEAPON_ORB_MIN_SPACING: f32 = 100.0;
    pub const WEAPON_ORB_PLAYER_AVOID: f32 = 150.0;

    /// Scoring
    pub const SCORE_PER_KILL: u64 = 10;
    /// One bonus point per this many seconds survived
    pub const SCORE_TIME_DIVISOR_SECS: f32 = 10.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid can round up to exactly TAU
    if wrapped >= PI { wrapped - TAU } else { wrapped }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Unit vector for an angle
#[inline]
pub fn heading_vector(theta: f32) -> Vec2 {
    polar_to_cartesian(1.0, theta)
}
