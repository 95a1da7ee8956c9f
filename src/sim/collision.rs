//! Broad-phase collision: a spatial hash rebuilt every tick
//!
//! Each collidable hazard lands in exactly one cell, keyed by the floor of
//! its centre divided by the cell size. Point queries visit the 3x3 block of
//! cells around the query point, which is exact while
//! `MAX_HAZARD_RADIUS + PLAYER_HITBOX_RADIUS <= GRID_CELL_SIZE` (asserted in
//! [`crate::consts`]).
//!
//! Query order is deterministic for a given insertion order: neighbour cells
//! are visited row by row, entries in the order they were inserted.

use std::collections::HashMap;

use glam::Vec2;

use super::geom::circles_overlap;
use super::hazard::{Hazard, HazardId};
use super::pickup::WeaponOrb;
use crate::consts::GRID_CELL_SIZE;

/// Neighbour cell offsets, row by row
const NEIGHBOURS: [(i32, i32); 9] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (0, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Snapshot of a hazard taken at rebuild time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridEntry {
    pub id: HazardId,
    pub pos: Vec2,
    /// Effective radius (includes the frozen rim)
    pub radius: f32,
    /// Active hazards are lethal; frozen ones are solid but harmless
    pub lethal: bool,
}

/// Spatial hash over collidable hazards
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<i64, Vec<GridEntry>>,
    len: usize,
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialGrid {
    pub fn new() -> Self {
        Self::with_cell_size(GRID_CELL_SIZE)
    }

    pub fn with_cell_size(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(1.0),
            cells: HashMap::new(),
            len: 0,
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of indexed hazards
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    fn cell_of(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    #[inline]
    fn key(cx: i32, cy: i32) -> i64 {
        ((cx as i64) << 32) | (cy as u32 as i64)
    }

    /// Discard the previous index and insert every lethal or frozen hazard.
    /// Hazards with non-finite positions are skipped.
    pub fn rebuild<'a>(&mut self, hazards: impl IntoIterator<Item = &'a Hazard>) {
        // Keep the buckets' allocations across ticks
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
        self.len = 0;

        for hazard in hazards {
            if !hazard.is_collidable() || !hazard.pos().is_finite() {
                continue;
            }
            let (cx, cy) = self.cell_of(hazard.pos());
            self.cells.entry(Self::key(cx, cy)).or_default().push(GridEntry {
                id: hazard.id(),
                pos: hazard.pos(),
                radius: hazard.effective_radius(),
                lethal: hazard.is_lethal(),
            });
            self.len += 1;
        }

        self.cells.retain(|_, bucket| !bucket.is_empty());
    }

    /// Entries in the 3x3 neighbourhood around `pos`
    pub fn candidates(&self, pos: Vec2) -> impl Iterator<Item = &GridEntry> + '_ {
        let (cx, cy) = if pos.is_finite() { self.cell_of(pos) } else { (0, 0) };
        let valid = pos.is_finite();
        NEIGHBOURS
            .iter()
            .filter(move |_| valid)
            .filter_map(move |&(dx, dy)| {
                self.cells
                    .get(&Self::key(cx.saturating_add(dx), cy.saturating_add(dy)))
            })
            .flatten()
    }

    /// First hazard overlapping the circle at `pos`
    pub fn query_first(&self, pos: Vec2, radius: f32) -> Option<GridEntry> {
        self.candidates(pos)
            .find(|e| circles_overlap(pos, radius, e.pos, e.radius))
            .copied()
    }

    /// Every hazard overlapping the circle at `pos`
    pub fn query_all(&self, pos: Vec2, radius: f32) -> Vec<GridEntry> {
        self.candidates(pos)
            .filter(|e| circles_overlap(pos, radius, e.pos, e.radius))
            .copied()
            .collect()
    }
}

/// Index of the first orb touching the player (linear scan)
pub fn first_orb_hit(player_pos: Vec2, player_radius: f32, orbs: &[WeaponOrb]) -> Option<usize> {
    orbs.iter()
        .position(|orb| circles_overlap(player_pos, player_radius, orb.pos, orb.radius))
}
