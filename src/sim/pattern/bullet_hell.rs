//! Bullet hell: a fan of streams enters from the top or bottom edge

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::{Pattern, PatternCore};
use crate::sim::SimRng;
use crate::sim::geom::{Bounds, EdgeMode};

const SPEED: f32 = 300.0;
const STREAMS: usize = 12;
const PER_STREAM: usize = 4;
/// Start distance outside the arena edge
const ENTRY_OFFSET: f32 = 50.0;
const RETIRE_MARGIN: f32 = ENTRY_OFFSET + 10.0;

pub struct BulletHell {
    core: PatternCore,
    duration_ms: f32,
}

impl BulletHell {
    pub fn new(core: PatternCore) -> Self {
        let duration_ms = core.difficulty().pick(10_000.0, 12_000.0, 15_000.0);
        Self { core, duration_ms }
    }
}

impl Pattern for BulletHell {
    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn spawn(&mut self, _origin: Vec2, bounds: Bounds, rng: &mut SimRng) {
        let from_top = rng.random_bool(0.5);
        let (start_y, inward) = if from_top {
            (-ENTRY_OFFSET, 1.0)
        } else {
            (bounds.height + ENTRY_OFFSET, -1.0)
        };
        let centre_x = bounds.width / 2.0;
        let spread = bounds.width / 2.0 - ENTRY_OFFSET;

        for stream in 0..STREAMS {
            let base = stream as f32 * TAU / STREAMS as f32;
            for i in 0..PER_STREAM {
                let angle = base + (i as f32 * 0.2).sin() * 0.3;
                let pos = Vec2::new(centre_x + angle.cos() * spread, start_y);
                let vel = Vec2::new(angle.cos(), angle.sin().abs() * inward) * SPEED;
                self.core
                    .emit(pos, |h| h.with_velocity(vel).with_edges(EdgeMode::Open));
            }
        }
    }

    fn update(&mut self, dt: f32, player: Vec2, bounds: Bounds, rng: &mut SimRng) {
        self.core.update_all(dt, bounds, player, rng);
        self.core.retire_outside(bounds, RETIRE_MARGIN);
        if self.core.elapsed_ms() > self.duration_ms {
            self.core.retire_unfrozen();
        }
    }

    fn is_actively_spawning(&self) -> bool {
        self.core.any_spawning()
    }
}
