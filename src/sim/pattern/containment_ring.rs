//! Containment ring: a circle of hazards closes in on the player

use std::f32::consts::TAU;

use glam::Vec2;

use super::{Pattern, PatternCore};
use crate::polar_to_cartesian;
use crate::sim::SimRng;
use crate::sim::geom::{Bounds, seek};

const RING_RADIUS: f32 = 100.0;
const SPEED: f32 = 30.0;
const COUNT: usize = 40;
/// Hazards that get this close to the player dissolve
const DISSOLVE_RADIUS: f32 = 20.0;

pub struct ContainmentRing {
    core: PatternCore,
}

impl ContainmentRing {
    pub fn new(core: PatternCore) -> Self {
        Self { core }
    }
}

impl Pattern for ContainmentRing {
    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn spawn(&mut self, origin: Vec2, _bounds: Bounds, _rng: &mut SimRng) {
        for i in 0..COUNT {
            let angle = TAU * i as f32 / COUNT as f32;
            self.core.emit(origin + polar_to_cartesian(RING_RADIUS, angle), |h| h);
        }
    }

    fn update(&mut self, dt: f32, player: Vec2, bounds: Bounds, rng: &mut SimRng) {
        for hazard in self.core.live_mut() {
            if !hazard.is_lethal() || hazard.is_zombie() {
                continue;
            }
            if hazard.pos().distance(player) <= DISSOLVE_RADIUS {
                hazard.kill();
            } else if let Some(v) = seek(hazard.pos(), player, SPEED) {
                hazard.steer(v);
            }
        }
        self.core.update_all(dt, bounds, player, rng);
    }

    fn is_actively_spawning(&self) -> bool {
        self.core.any_spawning()
    }
}
