//! Sparse grids: a lattice of hazards that creeps toward the player

use glam::Vec2;

use super::{Pattern, PatternCore, creep_toward};
use crate::sim::SimRng;
use crate::sim::geom::Bounds;

/// Creep slows down linearly inside this distance
const SLOW_RADIUS: f32 = 50.0;

/// Lattice geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridLayout {
    /// 85 px spacing inside a 100 px margin
    Sparse,
    /// 170 px spacing, centred
    UltraSparse,
}

impl GridLayout {
    /// Cell centres of the lattice
    fn points(self, bounds: Bounds) -> Vec<Vec2> {
        let (spacing, origin, cols, rows) = match self {
            GridLayout::Sparse => {
                let margin = 100.0;
                let spacing = 85.0;
                let cols = ((bounds.width - margin * 2.0) / spacing).floor().max(0.0) as u32;
                let rows = ((bounds.height - margin * 2.0) / spacing).floor().max(0.0) as u32;
                (spacing, Vec2::splat(margin), cols, rows)
            }
            GridLayout::UltraSparse => {
                let spacing = 170.0;
                let cols = (bounds.width / spacing).floor().max(0.0) as u32;
                let rows = (bounds.height / spacing).floor().max(0.0) as u32;
                let origin = Vec2::new(
                    (bounds.width - cols as f32 * spacing) / 2.0,
                    (bounds.height - rows as f32 * spacing) / 2.0,
                );
                (spacing, origin, cols, rows)
            }
        };

        let mut points = Vec::with_capacity((cols * rows) as usize);
        for row in 0..rows {
            for col in 0..cols {
                points.push(
                    origin + Vec2::new(col as f32, row as f32) * spacing + Vec2::splat(spacing / 2.0),
                );
            }
        }
        points
    }
}

pub struct SparseGrid {
    core: PatternCore,
    layout: GridLayout,
    speed: f32,
}

impl SparseGrid {
    pub fn new(core: PatternCore, layout: GridLayout) -> Self {
        let speed = core.difficulty().pick(20.0, 30.0, 40.0);
        Self { core, layout, speed }
    }

    pub fn layout(&self) -> GridLayout {
        self.layout
    }
}

impl Pattern for SparseGrid {
    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn spawn(&mut self, _origin: Vec2, bounds: Bounds, _rng: &mut SimRng) {
        for point in self.layout.points(bounds) {
            self.core.emit(point, |h| h);
        }
    }

    fn update(&mut self, dt: f32, player: Vec2, bounds: Bounds, rng: &mut SimRng) {
        let speed = self.speed;
        for hazard in self.core.live_mut() {
            if hazard.is_lethal() && !hazard.is_zombie() {
                if let Some(v) = creep_toward(hazard.pos(), player, speed, SLOW_RADIUS) {
                    hazard.steer(v);
                }
            }
        }
        self.core.update_all(dt, bounds, player, rng);
    }

    fn is_actively_spawning(&self) -> bool {
        self.core.any_spawning()
    }
}
