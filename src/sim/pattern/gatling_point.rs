//! Gatling point: a fixed emitter fires aimed hazards that ricochet off walls

use glam::Vec2;

use super::{LINGER_MS, Pattern, PatternCore};
use crate::sim::SimRng;
use crate::sim::geom::{Bounds, EdgeMode, random_position, seek};

const SPEED: f32 = 400.0;
const EMITTER_MARGIN: f32 = 50.0;

pub struct GatlingPoint {
    core: PatternCore,
    shoot_duration_ms: f32,
    shoot_interval_ms: f32,
    since_shot_ms: f32,
    emitter: Vec2,
}

impl GatlingPoint {
    pub fn new(core: PatternCore) -> Self {
        let difficulty = core.difficulty();
        Self {
            core,
            shoot_duration_ms: difficulty.pick(3000.0, 4500.0, 6000.0),
            shoot_interval_ms: difficulty.pick(100.0, 80.0, 50.0),
            since_shot_ms: 0.0,
            emitter: Vec2::ZERO,
        }
    }

    pub fn emitter(&self) -> Vec2 {
        self.emitter
    }
}

impl Pattern for GatlingPoint {
    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn spawn(&mut self, _origin: Vec2, bounds: Bounds, rng: &mut SimRng) {
        self.emitter = random_position(bounds, EMITTER_MARGIN, rng);
        self.since_shot_ms = 0.0;
    }

    fn update(&mut self, dt: f32, player: Vec2, bounds: Bounds, rng: &mut SimRng) {
        let elapsed = self.core.elapsed_ms();
        if elapsed <= self.shoot_duration_ms {
            self.since_shot_ms += dt * 1000.0;
            if self.since_shot_ms >= self.shoot_interval_ms {
                self.since_shot_ms = 0.0;
                // Player exactly on the emitter: the shot just sits there
                let vel = seek(self.emitter, player, SPEED).unwrap_or(Vec2::ZERO);
                self.core
                    .emit(self.emitter, |h| h.with_velocity(vel).with_edges(EdgeMode::Clamp));
            }
        } else if elapsed > self.shoot_duration_ms + LINGER_MS {
            self.core.retire_unfrozen();
        }

        for hazard in self.core.live_mut() {
            if hazard.is_lethal() {
                hazard.bounce_in(bounds);
            }
        }
        self.core.update_all(dt, bounds, player, rng);
    }

    fn is_actively_spawning(&self) -> bool {
        self.core.elapsed_ms() <= self.shoot_duration_ms
    }
}
