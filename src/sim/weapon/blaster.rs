//! Blaster: tracks the player while charging, then locks its aim and sends
//! a long bolt down the line, destroying everything it sweeps over.

use glam::Vec2;

use super::{Weapon, WeaponCore, WeaponKind};
use crate::heading_vector;
use crate::sim::geom::Bounds;
use crate::sim::hazard::Hazard;
use crate::sim::player::Player;

const CHARGE_MS: f32 = 1000.0;
const BOLT_SPEED: f32 = 600.0;
const BOLT_HALF_WIDTH: f32 = 7.0;
const BOLT_HALF_LENGTH: f32 = 77.0;
/// The bolt is spent once its centre is this many arena lengths away
const RANGE_FACTOR: f32 = 1.5;

#[derive(Debug, Clone, Copy)]
struct Bolt {
    origin: Vec2,
    dir: Vec2,
    /// Distance of the bolt centre from `origin`
    travelled: f32,
}

impl Bolt {
    fn sweeps(&self, pos: Vec2, radius: f32) -> bool {
        let rel = pos - self.origin;
        let along = rel.dot(self.dir) - self.travelled;
        let across = rel.perp_dot(self.dir);
        along.abs() <= BOLT_HALF_LENGTH + radius && across.abs() <= BOLT_HALF_WIDTH + radius
    }
}

pub struct Blaster {
    core: WeaponCore,
    aim_pos: Vec2,
    aim_heading: f32,
    bolt: Option<Bolt>,
    spent: bool,
}

impl Blaster {
    pub fn new() -> Self {
        Self {
            core: WeaponCore::new(),
            aim_pos: Vec2::ZERO,
            aim_heading: 0.0,
            bolt: None,
            spent: false,
        }
    }

    pub fn is_charging(&self) -> bool {
        self.bolt.is_none() && !self.spent
    }

    /// Centre of the bolt in flight
    pub fn bolt_center(&self) -> Option<Vec2> {
        self.bolt.map(|b| b.origin + b.dir * b.travelled)
    }
}

impl Default for Blaster {
    fn default() -> Self {
        Self::new()
    }
}

impl Weapon for Blaster {
    fn kind(&self) -> WeaponKind {
        WeaponKind::Blaster
    }

    fn core(&self) -> &WeaponCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WeaponCore {
        &mut self.core
    }

    fn activate(&mut self, player: &Player, _hazards: &mut [&mut Hazard]) {
        self.aim_pos = player.pos;
        self.aim_heading = player.heading;
        self.bolt = None;
        self.spent = false;
    }

    fn update(&mut self, dt: f32, player: &Player, hazards: &mut [&mut Hazard], bounds: Bounds) {
        if self.spent {
            return;
        }
        let Some(bolt) = &mut self.bolt else {
            self.aim_pos = player.pos;
            self.aim_heading = player.heading;
            if self.core.elapsed_ms() >= CHARGE_MS {
                self.bolt = Some(Bolt {
                    origin: self.aim_pos,
                    dir: heading_vector(self.aim_heading),
                    travelled: 0.0,
                });
            }
            return;
        };

        bolt.travelled += BOLT_SPEED * dt;
        let mut kills = 0;
        for hazard in hazards.iter_mut() {
            if !hazard.is_dead() && bolt.sweeps(hazard.pos(), hazard.radius()) {
                hazard.kill();
                kills += 1;
            }
        }
        self.core.credit(kills);

        if bolt.travelled > RANGE_FACTOR * bounds.max_side() {
            self.bolt = None;
            self.spent = true;
        }
    }

    fn is_complete(&self) -> bool {
        self.spent
    }

    fn clear(&mut self) {
        self.bolt = None;
    }
}
