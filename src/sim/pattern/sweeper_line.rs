//! Sweeper line: a wall of hazards with a few gaps marches across the arena

use glam::Vec2;
use rand::Rng;

use super::{Pattern, PatternCore};
use crate::sim::SimRng;
use crate::sim::geom::{Bounds, EdgeMode};

const DURATION_MS: f32 = 20_000.0;
const SPEED: f32 = 100.0;
const STEP: f32 = 5.0;
const GAP_COUNT: usize = 5;
/// Hazards are retired this far outside the arena
const RETIRE_MARGIN: f32 = 100.0;

/// Arena edge the line starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

pub struct SweeperLine {
    core: PatternCore,
    gap_width: f32,
}

impl SweeperLine {
    pub fn new(core: PatternCore) -> Self {
        let gap_width = core.difficulty().pick(75.0, 70.0, 65.0);
        Self { core, gap_width }
    }

    /// Gap width and gap centres along a line of `length`: one gap per
    /// equal slot, jittered inside its slot
    fn gaps(&self, length: f32, rng: &mut SimRng) -> (f32, Vec<f32>) {
        let slot = length / GAP_COUNT as f32;
        let width = self.gap_width.min(slot * 0.9);
        let slack = (slot - width) / 2.0;
        let centres = (0..GAP_COUNT)
            .map(|i| slot * (i as f32 + 0.5) + rng.random_range(-slack..=slack))
            .collect();
        (width, centres)
    }
}

impl Pattern for SweeperLine {
    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn spawn(&mut self, _origin: Vec2, bounds: Bounds, rng: &mut SimRng) {
        let edge = match rng.random_range(0..4) {
            0 => Edge::Top,
            1 => Edge::Bottom,
            2 => Edge::Left,
            _ => Edge::Right,
        };
        let (length, vel) = match edge {
            Edge::Top => (bounds.width, Vec2::new(0.0, SPEED)),
            Edge::Bottom => (bounds.width, Vec2::new(0.0, -SPEED)),
            Edge::Left => (bounds.height, Vec2::new(SPEED, 0.0)),
            Edge::Right => (bounds.height, Vec2::new(-SPEED, 0.0)),
        };
        let (gap_width, gaps) = self.gaps(length, rng);
        let half_gap = gap_width / 2.0;

        let mut along = 0.0;
        while along <= length {
            if !gaps.iter().any(|g| (along - g).abs() < half_gap) {
                let pos = match edge {
                    Edge::Top => Vec2::new(along, 0.0),
                    Edge::Bottom => Vec2::new(along, bounds.height),
                    Edge::Left => Vec2::new(0.0, along),
                    Edge::Right => Vec2::new(bounds.width, along),
                };
                self.core
                    .emit(pos, |h| h.with_velocity(vel).with_edges(EdgeMode::Open));
            }
            along += STEP;
        }
    }

    fn update(&mut self, dt: f32, player: Vec2, bounds: Bounds, rng: &mut SimRng) {
        self.core.update_all(dt, bounds, player, rng);
        self.core.retire_outside(bounds, RETIRE_MARGIN);
        if self.core.elapsed_ms() > DURATION_MS {
            self.core.retire_unfrozen();
        }
    }

    fn is_actively_spawning(&self) -> bool {
        self.core.any_spawning()
    }
}
