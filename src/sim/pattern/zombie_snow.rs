//! Zombie snow: hazards drift in at random positions and home on the player

use glam::Vec2;

use super::{LINGER_MS, Pattern, PatternCore};
use crate::consts::HAZARD_RADIUS;
use crate::sim::geom::{Bounds, random_position, seek};
use crate::sim::SimRng;

const DURATION_MS: f32 = 15_000.0;
const HOMING_SPEED: f32 = 50.0;

pub struct ZombieSnow {
    core: PatternCore,
    spawn_interval_ms: f32,
    since_spawn_ms: f32,
}

impl ZombieSnow {
    pub fn new(core: PatternCore) -> Self {
        let spawn_interval_ms = core.difficulty().pick(500.0, 300.0, 150.0);
        Self {
            core,
            spawn_interval_ms,
            since_spawn_ms: 0.0,
        }
    }
}

impl Pattern for ZombieSnow {
    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn spawn(&mut self, _origin: Vec2, _bounds: Bounds, _rng: &mut SimRng) {
        self.since_spawn_ms = 0.0;
    }

    fn update(&mut self, dt: f32, player: Vec2, bounds: Bounds, rng: &mut SimRng) {
        let elapsed = self.core.elapsed_ms();
        if elapsed <= DURATION_MS {
            self.since_spawn_ms += dt * 1000.0;
            if self.since_spawn_ms >= self.spawn_interval_ms {
                self.since_spawn_ms = 0.0;
                let pos = random_position(bounds, HAZARD_RADIUS * 2.0, rng);
                self.core.emit(pos, |h| h);
            }
        } else if elapsed > DURATION_MS + LINGER_MS {
            self.core.retire_unfrozen();
        }

        for hazard in self.core.live_mut() {
            if hazard.is_lethal() {
                if let Some(v) = seek(hazard.pos(), player, HOMING_SPEED) {
                    hazard.steer(v);
                }
            }
        }
        self.core.update_all(dt, bounds, player, rng);
    }

    fn is_actively_spawning(&self) -> bool {
        self.core.elapsed_ms() <= DURATION_MS
    }
}
