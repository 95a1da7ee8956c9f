//! Bouncing ball: a rigid disc of hazards bouncing around the arena
//!
//! Members keep fixed offsets from a shared centre. An external push on a
//! member (a repellent field, for instance) is folded back into the centre,
//! so the whole cluster translates together.

use std::collections::{HashMap, HashSet};
use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::{Pattern, PatternCore};
use crate::consts::HAZARD_RADIUS;
use crate::polar_to_cartesian;
use crate::sim::SimRng;
use crate::sim::geom::{Bounds, bounce_in_bounds};
use crate::sim::hazard::HazardId;

const DURATION_MS: f32 = 30_000.0;
const BALL_RADIUS: f32 = 120.0;
const HAZARD_COUNT: usize = 200;
const PER_RING: usize = 20;

pub struct BouncingBall {
    core: PatternCore,
    speed: f32,
    centre: Vec2,
    centre_vel: Vec2,
    offsets: HashMap<HazardId, Vec2>,
}

impl BouncingBall {
    pub fn new(core: PatternCore) -> Self {
        let speed = core.difficulty().pick(80.0, 120.0, 180.0);
        Self {
            core,
            speed,
            centre: Vec2::ZERO,
            centre_vel: Vec2::ZERO,
            offsets: HashMap::new(),
        }
    }

    pub fn centre(&self) -> Vec2 {
        self.centre
    }

    fn ring_offsets() -> Vec<Vec2> {
        let rings = HAZARD_COUNT.div_ceil(PER_RING);
        let mut offsets = Vec::with_capacity(HAZARD_COUNT);
        for ring in 0..rings {
            let radius = BALL_RADIUS * (ring + 1) as f32 / rings as f32;
            let in_ring = PER_RING.min(HAZARD_COUNT - offsets.len());
            for i in 0..in_ring {
                offsets.push(polar_to_cartesian(radius, i as f32 / in_ring as f32 * TAU));
            }
        }
        offsets
    }
}

impl Pattern for BouncingBall {
    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn spawn(&mut self, _origin: Vec2, bounds: Bounds, rng: &mut SimRng) {
        self.centre = bounds.center();
        self.centre_vel = polar_to_cartesian(self.speed, rng.random::<f32>() * TAU);
        let vel = self.centre_vel;
        for offset in Self::ring_offsets() {
            let id = self.core.emit(self.centre + offset, |h| h.with_velocity(vel));
            self.offsets.insert(id, offset);
        }
    }

    fn update(&mut self, dt: f32, player: Vec2, bounds: Bounds, rng: &mut SimRng) {
        // Members were integrated one step along the centre's velocity last
        // tick; anything beyond that is an external push. The strongest push
        // on any member moves the whole cluster.
        let expected = self.centre + self.centre_vel * dt;
        let push = self
            .core
            .live()
            .filter(|h| !h.is_frozen() && !h.is_zombie())
            .filter_map(|h| self.offsets.get(&h.id()).map(|&offset| h.pos() - (expected + offset)))
            .max_by(|a, b| a.length_squared().total_cmp(&b.length_squared()))
            .unwrap_or(Vec2::ZERO);
        self.centre = expected + push;
        bounce_in_bounds(
            &mut self.centre,
            &mut self.centre_vel,
            BALL_RADIUS + HAZARD_RADIUS,
            bounds,
        );

        for hazard in self.core.live_mut() {
            if hazard.is_frozen() || hazard.is_zombie() {
                continue;
            }
            if let Some(&offset) = self.offsets.get(&hazard.id()) {
                hazard.place(self.centre + offset);
                hazard.steer(self.centre_vel);
            }
        }

        self.core.update_all(dt, bounds, player, rng);

        if self.core.elapsed_ms() > DURATION_MS {
            self.core.retire_unfrozen();
        }
        if self.offsets.len() != self.core.live_count() {
            let live: HashSet<HazardId> = self.core.live().map(|h| h.id()).collect();
            self.offsets.retain(|id, _| live.contains(id));
        }
    }

    fn is_actively_spawning(&self) -> bool {
        self.core.any_spawning()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Difficulty;
    use crate::sim::pattern::PatternKind;
    use crate::sim::pattern::test_support::*;

    fn spawned() -> (BouncingBall, SimRng) {
        let mut rng = rng();
        let mut pattern = BouncingBall::new(core(PatternKind::BouncingBall, Difficulty::Medium));
        pattern.spawn(Vec2::ZERO, bounds(), &mut rng);
        (pattern, rng)
    }

    #[test]
    fn test_spawns_two_hundred_in_rings() {
        let (pattern, _) = spawned();
        assert_eq!(pattern.live_count(), HAZARD_COUNT);
        let max = pattern
            .core()
            .hazards()
            .iter()
            .map(|h| h.pos().distance(pattern.centre()))
            .fold(0.0, f32::max);
        assert!((max - BALL_RADIUS).abs() < 1e-2);
    }

    #[test]
    fn test_cluster_stays_rigid_and_in_bounds() {
        let (mut pattern, mut rng) = spawned();
        run(&mut pattern, Vec2::new(-500.0, -500.0), 6.0, &mut rng);
        let centre = pattern.centre();
        assert!(centre.x >= BALL_RADIUS && centre.x <= 400.0 - BALL_RADIUS);
        for hazard in pattern.core().live() {
            let offset = pattern.offsets[&hazard.id()];
            assert!((hazard.pos() - (centre + offset)).length() < 5.0);
        }
    }

    #[test]
    fn test_wall_bounces_do_not_push_the_centre_out() {
        let mut rng = rng();
        let mut pattern = BouncingBall::new(core(PatternKind::BouncingBall, Difficulty::Hard));
        pattern.spawn(Vec2::ZERO, bounds(), &mut rng);
        let margin = BALL_RADIUS + HAZARD_RADIUS;
        let far = Vec2::new(-500.0, -500.0);
        run(&mut pattern, far, 1.1, &mut rng);
        let speed = pattern.centre_vel.length();

        let mut bounces = 0;
        for _ in 0..1200 {
            let heading = pattern.centre_vel;
            step(&mut pattern, far, &mut rng);
            if pattern.centre_vel != heading {
                bounces += 1;
            }
            let c = pattern.centre();
            assert!(c.x >= margin - 1e-3 && c.x <= 400.0 - margin + 1e-3, "centre {c:?}");
            assert!(c.y >= margin - 1e-3 && c.y <= 800.0 - margin + 1e-3, "centre {c:?}");
        }
        assert!(bounces > 0);
        assert!((pattern.centre_vel.length() - speed).abs() < 1e-3);
    }

    #[test]
    fn test_push_on_one_member_moves_the_cluster() {
        let (mut pattern, mut rng) = spawned();
        run(&mut pattern, Vec2::new(-500.0, -500.0), 1.1, &mut rng);
        let before = pattern.centre();
        if let Some(first) = pattern.core_mut().hazards_mut().first_mut() {
            first.displace(Vec2::new(10.0, 0.0));
        }
        step(&mut pattern, Vec2::new(-500.0, -500.0), &mut rng);
        let moved = pattern.centre() - before;
        // One tick of travel (at most 2 px) plus the 10 px push
        assert!(moved.x > 7.0, "centre moved {moved:?}");
    }

    #[test]
    fn test_frozen_member_stays_put() {
        let (mut pattern, mut rng) = spawned();
        run(&mut pattern, Vec2::new(-500.0, -500.0), 1.1, &mut rng);
        let frozen_at = {
            let first = &mut pattern.core_mut().hazards_mut()[0];
            first.freeze();
            first.pos()
        };
        run(&mut pattern, Vec2::new(-500.0, -500.0), 1.0, &mut rng);
        assert_eq!(pattern.core().hazards()[0].pos(), frozen_at);
    }
}
