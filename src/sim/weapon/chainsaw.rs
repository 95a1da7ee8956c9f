//! Chainsaw: a spinning blade around the player that cuts through any dot
//! it touches.

use super::{Weapon, WeaponCore, WeaponKind, kill_within};
use crate::sim::geom::Bounds;
use crate::sim::hazard::Hazard;
use crate::sim::player::Player;

const DURATION_MS: f32 = 5000.0;
const REACH: f32 = 50.0;

#[derive(Default)]
pub struct Chainsaw {
    core: WeaponCore,
}

impl Chainsaw {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reach(&self) -> f32 {
        REACH
    }
}

impl Weapon for Chainsaw {
    fn kind(&self) -> WeaponKind {
        WeaponKind::Chainsaw
    }

    fn core(&self) -> &WeaponCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WeaponCore {
        &mut self.core
    }

    fn activate(&mut self, _player: &Player, _hazards: &mut [&mut Hazard]) {}

    fn update(&mut self, _dt: f32, player: &Player, hazards: &mut [&mut Hazard], _bounds: Bounds) {
        if self.is_complete() {
            return;
        }
        let mut lethal: Vec<&mut Hazard> = hazards
            .iter_mut()
            .filter(|h| h.is_lethal())
            .map(|h| &mut **h)
            .collect();
        let kills = kill_within(&mut lethal, player.pos, REACH);
        self.core.credit(kills);
    }

    fn is_complete(&self) -> bool {
        self.core.elapsed_ms() >= DURATION_MS
    }
}
