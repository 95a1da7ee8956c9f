//! Simulation settings and tuning
//!
//! Loaded from a JSON file; any missing key falls back to the default from
//! [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::SimError;
use crate::consts::*;
use crate::sim::Difficulty;

/// Simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed for reproducibility
    pub seed: u64,

    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,
    /// Torus-wrap the player and hazards at the arena edges
    pub wrap: bool,

    // === Pattern scheduling ===
    /// Delay before the first pattern (ms)
    pub first_pattern_delay_ms: f32,
    /// Pattern interval at score 0 (ms)
    pub pattern_interval_base_ms: f32,
    /// Pattern interval floor (ms)
    pub pattern_interval_min_ms: f32,
    /// Score at which the interval floor is reached
    pub pattern_interval_full_score: u64,
    /// Total random spread applied around the interval (ms)
    pub pattern_interval_jitter_ms: f32,
    /// When nothing is actively spawning, start a new pattern after this long (ms)
    pub idle_spawn_delay_ms: f32,

    // === Difficulty ===
    pub medium_score: u64,
    pub hard_score: u64,

    // === Pickups ===
    pub weapon_orb_count: usize,
    pub weapon_orb_min_spacing: f32,
    pub weapon_orb_player_avoid: f32,

    // === Scheduler ===
    /// Ticks run per frame before the backlog is carried to the next frame
    pub max_substeps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5eed,

            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            wrap: true,

            first_pattern_delay_ms: 3000.0,
            pattern_interval_base_ms: 4000.0,
            pattern_interval_min_ms: 1500.0,
            pattern_interval_full_score: 5000,
            pattern_interval_jitter_ms: 1000.0,
            idle_spawn_delay_ms: 1000.0,

            medium_score: 500,
            hard_score: 1500,

            weapon_orb_count: WEAPON_ORB_COUNT,
            weapon_orb_min_spacing: WEAPON_ORB_MIN_SPACING,
            weapon_orb_player_avoid: WEAPON_ORB_PLAYER_AVOID,

            max_substeps: MAX_SUBSTEPS,
        }
    }
}

impl Settings {
    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Pattern interval before jitter, shrinking linearly with score
    pub fn pattern_interval_for_score(&self, score: u64) -> f32 {
        let full = self.pattern_interval_full_score.max(1) as f32;
        let ratio = (score as f32 / full).min(1.0);
        self.pattern_interval_base_ms
            - ratio * (self.pattern_interval_base_ms - self.pattern_interval_min_ms)
    }

    /// Difficulty tier for a score
    pub fn difficulty_for_score(&self, score: u64) -> Difficulty {
        if score >= self.hard_score {
            Difficulty::Hard
        } else if score >= self.medium_score {
            Difficulty::Medium
        } else {
            Difficulty::Easy
        }
    }
}
