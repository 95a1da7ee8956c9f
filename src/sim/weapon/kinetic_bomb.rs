//! Kinetic bomb: a short collapse, then a wide blast that destroys every
//! hazard inside it for the rest of the effect.

use glam::Vec2;

use super::{Weapon, WeaponCore, WeaponKind, kill_within};
use crate::sim::geom::Bounds;
use crate::sim::hazard::Hazard;
use crate::sim::player::Player;

const COLLAPSE_MS: f32 = 100.0;
const DURATION_MS: f32 = 1000.0;
/// Blast radius as a fraction of arena width
const RADIUS_FACTOR: f32 = 0.45;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Collapsing,
    Exploding,
    Done,
}

pub struct KineticBomb {
    core: WeaponCore,
    stage: Stage,
    center: Vec2,
    radius: f32,
}

impl KineticBomb {
    pub fn new() -> Self {
        Self {
            core: WeaponCore::new(),
            stage: Stage::Collapsing,
            center: Vec2::ZERO,
            radius: 0.0,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Zero until the blast starts
    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Default for KineticBomb {
    fn default() -> Self {
        Self::new()
    }
}

impl Weapon for KineticBomb {
    fn kind(&self) -> WeaponKind {
        WeaponKind::KineticBomb
    }

    fn core(&self) -> &WeaponCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WeaponCore {
        &mut self.core
    }

    fn activate(&mut self, player: &Player, _hazards: &mut [&mut Hazard]) {
        self.center = player.pos;
        self.stage = Stage::Collapsing;
    }

    fn update(&mut self, _dt: f32, _player: &Player, hazards: &mut [&mut Hazard], bounds: Bounds) {
        let elapsed = self.core.elapsed_ms();
        if self.stage == Stage::Collapsing && elapsed >= COLLAPSE_MS {
            self.stage = Stage::Exploding;
            self.radius = RADIUS_FACTOR * bounds.width;
        }
        if self.stage == Stage::Exploding {
            let kills = kill_within(hazards, self.center, self.radius);
            self.core.credit(kills);
            if elapsed >= DURATION_MS {
                self.stage = Stage::Done;
            }
        }
    }

    fn is_complete(&self) -> bool {
        self.stage == Stage::Done
    }
}
