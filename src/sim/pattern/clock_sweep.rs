//! Clock sweep: three rotating hands of hazards pinned at a hub

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::{Pattern, PatternCore};
use crate::polar_to_cartesian;
use crate::sim::{Difficulty, SimRng};
use crate::sim::geom::{Bounds, EdgeMode};
use crate::sim::hazard::HazardId;

const DURATION_MS: f32 = 25_000.0;
/// Hands grow from the hub to full length over this long
const GROW_MS: f32 = 2000.0;

/// Hand template: angular speed (rad/s), length, hazard count, skipped slots
struct HandSpec {
    speed: f32,
    length: f32,
    count: usize,
    gaps: &'static [usize],
}

fn hand_specs(difficulty: Difficulty) -> [HandSpec; 3] {
    const SECOND: (f32, f32, usize) = (1.5, 400.0, 15);
    const MINUTE: (f32, f32, usize) = (0.4, 350.0, 20);
    const HOUR: (f32, f32, usize) = (0.15, 200.0, 25);

    let scaled = |(speed, length, count): (f32, f32, usize),
                  speed_k: f32,
                  length_k: f32,
                  extra: isize,
                  gaps: &'static [usize]| {
        HandSpec {
            speed: speed * speed_k,
            length: length * length_k,
            count: (count as isize + extra).max(2) as usize,
            gaps,
        }
    };

    match difficulty {
        Difficulty::Easy => [
            scaled(SECOND, 0.8, 0.9, -3, &[]),
            scaled(MINUTE, 0.8, 0.9, -3, &[9, 10]),
            scaled(HOUR, 0.8, 0.9, -5, &[]),
        ],
        Difficulty::Medium => [
            scaled(SECOND, 1.0, 1.0, 0, &[]),
            scaled(MINUTE, 1.0, 1.0, 0, &[9, 10, 11]),
            scaled(HOUR, 1.0, 1.0, 0, &[]),
        ],
        Difficulty::Hard => [
            scaled(SECOND, 1.3, 1.0, 0, &[]),
            scaled(MINUTE, 1.2, 1.0, 0, &[8, 9, 10]),
            scaled(HOUR, 1.2, 1.0, 5, &[]),
        ],
    }
}

struct Hand {
    angle: f32,
    speed: f32,
    /// Member hazards and their distance from the hub at full length
    members: Vec<(HazardId, f32)>,
}

pub struct ClockSweep {
    core: PatternCore,
    hub: Vec2,
    hands: Vec<Hand>,
}

impl ClockSweep {
    pub fn new(core: PatternCore) -> Self {
        Self {
            core,
            hub: Vec2::ZERO,
            hands: Vec::new(),
        }
    }

    pub fn hub(&self) -> Vec2 {
        self.hub
    }

    fn grow_ratio(&self) -> f32 {
        (self.core.elapsed_ms() / GROW_MS).min(1.0)
    }
}

impl Pattern for ClockSweep {
    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn spawn(&mut self, origin: Vec2, _bounds: Bounds, rng: &mut SimRng) {
        self.hub = origin;
        self.hands = hand_specs(self.core.difficulty())
            .into_iter()
            .map(|spec| {
                let spacing = spec.length / (spec.count - 1) as f32;
                let members = (0..spec.count)
                    .filter(|i| !spec.gaps.contains(i))
                    .map(|i| (self.core.emit(origin, |h| h.with_edges(EdgeMode::Open)), i as f32 * spacing))
                    .collect();
                Hand {
                    angle: rng.random::<f32>() * TAU,
                    speed: spec.speed,
                    members,
                }
            })
            .collect();
    }

    fn update(&mut self, dt: f32, player: Vec2, bounds: Bounds, rng: &mut SimRng) {
        let ratio = self.grow_ratio();
        for hand in &mut self.hands {
            hand.angle += hand.speed * dt;
            for &(id, distance) in &hand.members {
                let Some(hazard) = self.core.get_mut(id) else {
                    continue;
                };
                if !hazard.is_lethal() || hazard.is_zombie() {
                    continue;
                }
                hazard.place(self.hub + polar_to_cartesian(distance * ratio, hand.angle));
                hazard.steer(Vec2::ZERO);
            }
        }
        self.core.update_all(dt, bounds, player, rng);

        if self.core.elapsed_ms() > DURATION_MS {
            self.core.retire_unfrozen();
        }
        let core = &self.core;
        for hand in &mut self.hands {
            hand.members.retain(|(id, _)| core.get(*id).is_some_and(|h| !h.is_dead()));
        }
    }

    fn is_actively_spawning(&self) -> bool {
        self.core.elapsed_ms() < GROW_MS || self.core.any_spawning()
    }
}
