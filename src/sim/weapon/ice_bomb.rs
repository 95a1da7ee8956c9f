//! Ice bomb: freezes every active hazard that is or wanders inside the blast
//! for as long as the effect lasts.

use glam::Vec2;

use super::{Weapon, WeaponCore, WeaponKind};
use crate::sim::geom::Bounds;
use crate::sim::hazard::Hazard;
use crate::sim::player::Player;

/// Full-strength burst, then a fade during which freezing continues
const BURST_MS: f32 = 500.0;
const DURATION_MS: f32 = 3000.0;
const RADIUS_FACTOR: f32 = 0.3;

pub struct IceBomb {
    core: WeaponCore,
    center: Vec2,
    radius: f32,
    frozen: u32,
}

impl IceBomb {
    pub fn new() -> Self {
        Self {
            core: WeaponCore::new(),
            center: Vec2::ZERO,
            radius: RADIUS_FACTOR * crate::consts::ARENA_WIDTH,
            frozen: 0,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Hazards frozen so far
    pub fn frozen_count(&self) -> u32 {
        self.frozen
    }

    /// Still in the initial burst
    pub fn is_bursting(&self) -> bool {
        self.core.elapsed_ms() < BURST_MS
    }

    fn freeze_inside(&mut self, hazards: &mut [&mut Hazard]) {
        for hazard in hazards.iter_mut() {
            if hazard.is_lethal() && hazard.pos().distance(self.center) <= self.radius {
                hazard.freeze();
                self.frozen += 1;
            }
        }
    }
}

impl Default for IceBomb {
    fn default() -> Self {
        Self::new()
    }
}

impl Weapon for IceBomb {
    fn kind(&self) -> WeaponKind {
        WeaponKind::IceBomb
    }

    fn core(&self) -> &WeaponCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WeaponCore {
        &mut self.core
    }

    fn activate(&mut self, player: &Player, hazards: &mut [&mut Hazard]) {
        self.center = player.pos;
        self.freeze_inside(hazards);
    }

    fn update(&mut self, _dt: f32, _player: &Player, hazards: &mut [&mut Hazard], bounds: Bounds) {
        if self.is_complete() {
            return;
        }
        if bounds.is_valid() {
            self.radius = RADIUS_FACTOR * bounds.width;
        }
        self.freeze_inside(hazards);
    }

    fn is_complete(&self) -> bool {
        self.core.elapsed_ms() >= DURATION_MS
    }
}
