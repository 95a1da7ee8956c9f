//! Weapon pickups scattered around the arena

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::SimRng;
use super::geom::{Bounds, random_position};
use super::weapon::WeaponKind;
use crate::Settings;
use crate::consts::*;

/// Placement attempts before falling back to the arena centre
const PLACEMENT_ATTEMPTS: u32 = 100;

/// A collectible orb that activates its weapon on touch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponOrb {
    pub kind: WeaponKind,
    pub pos: Vec2,
    pub radius: f32,
}

impl WeaponOrb {
    pub fn new(kind: WeaponKind, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            radius: WEAPON_ORB_RADIUS,
        }
    }
}

/// Keeps a fixed number of orbs on the field
#[derive(Debug, Clone)]
pub struct PickupField {
    orbs: Vec<WeaponOrb>,
    count: usize,
    min_spacing: f32,
    player_avoid: f32,
}

impl Default for PickupField {
    fn default() -> Self {
        Self::new(WEAPON_ORB_COUNT, WEAPON_ORB_MIN_SPACING, WEAPON_ORB_PLAYER_AVOID)
    }
}

impl PickupField {
    pub fn new(count: usize, min_spacing: f32, player_avoid: f32) -> Self {
        Self {
            orbs: Vec::with_capacity(count),
            count,
            min_spacing,
            player_avoid,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.weapon_orb_count,
            settings.weapon_orb_min_spacing,
            settings.weapon_orb_player_avoid,
        )
    }

    pub fn orbs(&self) -> &[WeaponOrb] {
        &self.orbs
    }

    /// Top the field back up to its target count. Each new orb carries a
    /// weapon drawn uniformly from `kinds`; nothing spawns if `kinds` is empty.
    pub fn refill(&mut self, bounds: Bounds, player: Vec2, kinds: &[WeaponKind], rng: &mut SimRng) {
        if kinds.is_empty() {
            return;
        }
        while self.orbs.len() < self.count {
            let pos = self.place(bounds, player, rng);
            let kind = kinds[rng.random_range(0..kinds.len())];
            self.orbs.push(WeaponOrb::new(kind, pos));
        }
    }

    /// Remove and return the orb at `index`
    pub fn take(&mut self, index: usize) -> Option<WeaponOrb> {
        (index < self.orbs.len()).then(|| self.orbs.remove(index))
    }

    pub fn clear(&mut self) {
        self.orbs.clear();
    }

    fn place(&self, bounds: Bounds, player: Vec2, rng: &mut SimRng) -> Vec2 {
        for _ in 0..PLACEMENT_ATTEMPTS {
            let pos = random_position(bounds, WEAPON_ORB_RADIUS, rng);
            if pos.distance(player) >= self.player_avoid
                && self.orbs.iter().all(|o| o.pos.distance(pos) >= self.min_spacing)
            {
                return pos;
            }
        }
        bounds.center()
    }
}
