//! Homing missiles: a fan of three missiles that each lock onto the hazard
//! cheapest to reach, turning at a bounded rate.

use glam::Vec2;

use super::{Weapon, WeaponCore, WeaponKind};
use crate::consts::SIM_DT;
use crate::sim::geom::Bounds;
use crate::sim::hazard::{Hazard, HazardId};
use crate::sim::player::Player;
use crate::{heading_vector, normalize_angle};

const SPREAD: f32 = std::f32::consts::PI / 6.0;
const BASE_SPEED: f32 = 800.0;
/// Share of the player's speed the missiles inherit
const INHERITED_SPEED: f32 = 0.5;
const MISSILE_RADIUS: f32 = 6.0;
/// Five degrees per 60 Hz tick
const TURN_RATE: f32 = 5.0_f32.to_radians() / SIM_DT;
const MAX_FLIGHT_MS: f32 = 4000.0;

#[derive(Debug, Clone, Copy)]
pub struct Missile {
    pub pos: Vec2,
    pub heading: f32,
    pub target: Option<HazardId>,
    pub active: bool,
}

impl Missile {
    fn velocity(&self, speed: f32) -> Vec2 {
        heading_vector(self.heading) * speed
    }
}

/// Cheapest lethal hazard to turn towards: distance weighted by how far
/// the missile would have to turn
fn pick_target(pos: Vec2, heading: f32, hazards: &[&mut Hazard]) -> Option<HazardId> {
    hazards
        .iter()
        .filter(|h| h.is_lethal())
        .map(|h| {
            let to = h.pos() - pos;
            let turn = normalize_angle(to.y.atan2(to.x) - heading).abs();
            (h.id(), to.length() * (1.0 + turn))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

pub struct HomingMissile {
    core: WeaponCore,
    missiles: Vec<Missile>,
    speed: f32,
}

impl HomingMissile {
    pub fn new() -> Self {
        Self {
            core: WeaponCore::new(),
            missiles: Vec::new(),
            speed: BASE_SPEED,
        }
    }

    pub fn missiles(&self) -> &[Missile] {
        &self.missiles
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }
}

impl Default for HomingMissile {
    fn default() -> Self {
        Self::new()
    }
}

impl Weapon for HomingMissile {
    fn kind(&self) -> WeaponKind {
        WeaponKind::HomingMissile
    }

    fn core(&self) -> &WeaponCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WeaponCore {
        &mut self.core
    }

    fn activate(&mut self, player: &Player, _hazards: &mut [&mut Hazard]) {
        self.speed = BASE_SPEED + INHERITED_SPEED * player.vel.length();
        self.missiles = [-SPREAD, 0.0, SPREAD]
            .into_iter()
            .map(|offset| Missile {
                pos: player.pos,
                heading: player.heading + offset,
                target: None,
                active: true,
            })
            .collect();
    }

    fn update(&mut self, dt: f32, _player: &Player, hazards: &mut [&mut Hazard], bounds: Bounds) {
        let expired = self.core.elapsed_ms() >= MAX_FLIGHT_MS;
        let mut kills = 0;

        for missile in self.missiles.iter_mut().filter(|m| m.active) {
            if expired {
                missile.active = false;
                continue;
            }

            let locked = missile
                .target
                .and_then(|id| hazards.iter().find(|h| h.id() == id))
                .filter(|h| h.is_lethal())
                .map(|h| h.pos());
            let aim = match locked {
                Some(pos) => Some(pos),
                None => {
                    missile.target = pick_target(missile.pos, missile.heading, hazards);
                    missile
                        .target
                        .and_then(|id| hazards.iter().find(|h| h.id() == id))
                        .map(|h| h.pos())
                }
            };

            if let Some(aim) = aim {
                let to = aim - missile.pos;
                let turn = normalize_angle(to.y.atan2(to.x) - missile.heading);
                let max_turn = TURN_RATE * dt;
                missile.heading = normalize_angle(missile.heading + turn.clamp(-max_turn, max_turn));
            }
            missile.pos += missile.velocity(self.speed) * dt;

            if let Some(struck) = hazards
                .iter_mut()
                .find(|h| h.is_lethal() && missile.pos.distance(h.pos()) < MISSILE_RADIUS + h.radius())
            {
                struck.kill();
                kills += 1;
                missile.active = false;
            } else if bounds.is_outside(missile.pos, MISSILE_RADIUS) {
                missile.active = false;
            }
        }
        self.core.credit(kills);
    }

    fn is_complete(&self) -> bool {
        self.missiles.iter().all(|m| !m.active)
    }

    fn clear(&mut self) {
        self.missiles.clear();
    }
}
