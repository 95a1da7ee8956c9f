//! Dot repellent: a field around the player that shoves nearby dots away,
//! harder the closer they are. Nothing is destroyed.

use super::{Weapon, WeaponCore, WeaponKind};
use crate::sim::geom::Bounds;
use crate::sim::hazard::Hazard;
use crate::sim::player::Player;

const DURATION_MS: f32 = 8000.0;
const FIELD_RADIUS: f32 = 100.0;
/// Push speed at the centre of the field, falling off linearly to zero at
/// the rim
const PUSH_SPEED: f32 = 300.0;

#[derive(Default)]
pub struct DotRepellent {
    core: WeaponCore,
}

impl DotRepellent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field_radius(&self) -> f32 {
        FIELD_RADIUS
    }
}

impl Weapon for DotRepellent {
    fn kind(&self) -> WeaponKind {
        WeaponKind::DotRepellent
    }

    fn core(&self) -> &WeaponCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WeaponCore {
        &mut self.core
    }

    fn activate(&mut self, _player: &Player, _hazards: &mut [&mut Hazard]) {}

    fn update(&mut self, dt: f32, player: &Player, hazards: &mut [&mut Hazard], _bounds: Bounds) {
        if self.is_complete() {
            return;
        }
        for hazard in hazards.iter_mut() {
            if hazard.is_dead() || hazard.is_frozen() {
                continue;
            }
            let offset = hazard.pos() - player.pos;
            let distance = offset.length();
            if distance <= 0.0 || distance >= FIELD_RADIUS {
                continue;
            }
            let falloff = 1.0 - distance / FIELD_RADIUS;
            hazard.displace(offset / distance * PUSH_SPEED * dt * falloff);
        }
    }

    fn is_complete(&self) -> bool {
        self.core.elapsed_ms() >= DURATION_MS
    }
}
