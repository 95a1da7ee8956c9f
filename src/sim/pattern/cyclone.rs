//! Cyclone: a swirl of hazards near a corner flings outward tangentially

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;
use rand::Rng;

use super::{Pattern, PatternCore};
use crate::polar_to_cartesian;
use crate::sim::SimRng;
use crate::sim::geom::{Bounds, EdgeMode};

const DURATION_MS: f32 = 25_000.0;
const COUNT: usize = 150;
const RETIRE_MARGIN: f32 = 50.0;

pub struct Cyclone {
    core: PatternCore,
    speed: f32,
    swirl_radius: f32,
    eye: Vec2,
}

impl Cyclone {
    pub fn new(core: PatternCore) -> Self {
        let difficulty = core.difficulty();
        Self {
            core,
            speed: difficulty.pick(150.0, 200.0, 300.0),
            swirl_radius: difficulty.pick(50.0, 60.0, 80.0),
            eye: Vec2::ZERO,
        }
    }

    pub fn eye(&self) -> Vec2 {
        self.eye
    }
}

impl Pattern for Cyclone {
    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn spawn(&mut self, _origin: Vec2, bounds: Bounds, rng: &mut SimRng) {
        let fx = if rng.random_bool(0.5) { 0.15 } else { 0.85 };
        let fy = if rng.random_bool(0.5) { 0.15 } else { 0.85 };
        self.eye = Vec2::new(bounds.width * fx, bounds.height * fy);

        for i in 0..COUNT {
            let angle = i as f32 / COUNT as f32 * TAU + (rng.random::<f32>() - 0.5) * 0.2;
            let radius = self.swirl_radius * (0.8 + rng.random::<f32>() * 0.4);
            let heading = angle + FRAC_PI_2 + (rng.random::<f32>() - 0.5) * 0.5;
            let speed = self.speed * (0.5 + rng.random::<f32>());
            let vel = polar_to_cartesian(speed, heading);
            self.core.emit(self.eye + polar_to_cartesian(radius, angle), |h| {
                h.with_velocity(vel).with_edges(EdgeMode::Open)
            });
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Difficulty;
    use crate::sim::pattern::PatternKind;
    use crate::sim::pattern::test_support::*;

    #[test]
    fn test_swirl_around_a_corner() {
        let mut rng = rng();
        let mut pattern = Cyclone::new(core(PatternKind::Cyclone, Difficulty::Hard));
        pattern.spawn(Vec2::ZERO, bounds(), &mut rng);
        assert_eq!(pattern.live_count(), COUNT);
        let eye = pattern.eye();
        assert!((eye.x - 60.0).abs() < 1e-3 || (eye.x - 340.0).abs() < 1e-3);
        for hazard in pattern.core().hazards() {
            let r = hazard.pos() - eye;
            assert!(r.length() <= 80.0 * 1.2 + 1e-3);
            // Mostly tangential: heading within ~45 degrees of perpendicular
            assert!(r.normalize().dot(hazard.vel().normalize()).abs() < 0.75);
        }
    }

    #[test]
    fn test_flung_hazards_retire() {
        let mut rng = rng();
        let mut pattern = Cyclone::new(core(PatternKind::Cyclone, Difficulty::Hard));
        pattern.spawn(Vec2::ZERO, bounds(), &mut rng);
        // Slowest hazard: 150 px/s across at most ~1030 px, after the spawn animation
        run(&mut pattern, Vec2::new(-900.0, -900.0), 10.0, &mut rng);
        assert!(pattern.is_complete());
    }
}
