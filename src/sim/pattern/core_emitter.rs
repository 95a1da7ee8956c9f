//! Core emitters: an oversized core hazard grows in at an arena anchor and
//! then fires volleys of bullets in one of several shapes.
//!
//! The core is a regular hazard owned by the pattern, so weapons can freeze
//! or kill it. A frozen core stops firing; a dead core never fires again.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Pattern, PatternCore};
use crate::consts::{CORE_HAZARD_RADIUS, HAZARD_RADIUS};
use crate::polar_to_cartesian;
use crate::sim::SimRng;
use crate::sim::geom::{Bounds, EdgeMode};
use crate::sim::hazard::{Hazard, HazardId};

const CORE_SPAWN_MS: f32 = 1500.0;
const VOLLEY_INTERVAL_MS: f32 = 150.0;
const BULLET_SPEED: f32 = 250.0;
const ANCHOR_MARGIN: f32 = CORE_HAZARD_RADIUS + 5.0;

/// Volley geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmitterShape {
    /// 16 bullets evenly around the core, slowly rotating
    CircleBurst,
    /// 7 bullets fanned downward, the fan swaying side to side
    Wave,
    /// 3 rotating arms of 2 bullets each
    Spiral,
    /// 5 bullets in a narrow spread aimed at the player
    AimedStreams,
}

pub struct CoreEmitter {
    core: PatternCore,
    shape: EmitterShape,
    shoot_duration_ms: f32,
    emitter: Option<HazardId>,
    origin: Vec2,
    volley_acc_ms: f32,
    phase: f32,
    volleys: u32,
}

impl CoreEmitter {
    pub fn new(core: PatternCore, shape: EmitterShape) -> Self {
        let shoot_duration_ms = core.difficulty().pick(3000.0, 3000.0, 4000.0);
        Self {
            core,
            shape,
            shoot_duration_ms,
            emitter: None,
            origin: Vec2::ZERO,
            volley_acc_ms: 0.0,
            phase: 0.0,
            volleys: 0,
        }
    }

    pub fn shape(&self) -> EmitterShape {
        self.shape
    }

    /// The core hazard, while it is still tracked
    pub fn emitter(&self) -> Option<&Hazard> {
        self.emitter.and_then(|id| self.core.get(id))
    }

    /// Volleys fired so far
    pub fn volleys(&self) -> u32 {
        self.volleys
    }

    fn window_ms(&self) -> f32 {
        self.shoot_duration_ms + CORE_SPAWN_MS
    }

    /// Live hazards other than the core
    fn bullets(&self) -> impl Iterator<Item = &Hazard> {
        let emitter = self.emitter;
        self.core.live().filter(move |h| Some(h.id()) != emitter)
    }

    fn fire(&mut self, player: Vec2, rng: &mut SimRng) {
        let phase = self.phase;
        // (angle, speed multiplier)
        let mut bullets: Vec<(f32, f32)> = Vec::with_capacity(16);
        match self.shape {
            EmitterShape::CircleBurst => {
                const COUNT: usize = 16;
                for i in 0..COUNT {
                    bullets.push((i as f32 * TAU / COUNT as f32 + phase * 0.5, 1.0));
                }
            }
            EmitterShape::Wave => {
                const COUNT: usize = 7;
                const WIDTH: f32 = PI;
                let base = FRAC_PI_2 + (phase * 2.0).sin() * 0.3;
                for i in 0..COUNT {
                    let offset = (i as f32 / (COUNT - 1) as f32 - 0.5) * WIDTH;
                    bullets.push((base + offset, 0.7 + offset.abs() * 0.3));
                }
            }
            EmitterShape::Spiral => {
                const ARMS: usize = 3;
                for arm in 0..ARMS {
                    let base = phase * 2.0 + arm as f32 * TAU / ARMS as f32;
                    for i in 0..2 {
                        bullets.push((base + i as f32 * 0.1, 0.8 + i as f32 * 0.1));
                    }
                }
            }
            EmitterShape::AimedStreams => {
                let to_player = player - self.origin;
                let base = to_player.y.atan2(to_player.x);
                for i in 0..5 {
                    let spread = (i as f32 - 2.0) * 0.15;
                    bullets.push((base + spread, 0.9 + rng.random::<f32>() * 0.2));
                }
            }
        }

        for (angle, mult) in bullets {
            let vel = polar_to_cartesian(BULLET_SPEED * mult, angle);
            self.core.emit(self.origin, |h| {
                h.with_velocity(vel).with_edges(EdgeMode::Open).already_active()
            });
        }
        self.volleys += 1;
    }
}

impl Pattern for CoreEmitter {
    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn spawn(&mut self, _origin: Vec2, bounds: Bounds, rng: &mut SimRng) {
        let (w, h, m) = (bounds.width, bounds.height, ANCHOR_MARGIN);
        let anchors = [
            Vec2::new(w / 2.0, m),
            Vec2::new(w / 2.0, h - m),
            Vec2::new(m, h / 2.0),
            Vec2::new(w - m, h / 2.0),
            Vec2::new(m, m),
            Vec2::new(w - m, m),
            Vec2::new(m, h - m),
            Vec2::new(w - m, h - m),
        ];
        self.origin = anchors[rng.random_range(0..anchors.len())];
        self.volley_acc_ms = 0.0;
        self.phase = 0.0;
        self.volleys = 0;
        self.emitter = Some(self.core.emit(self.origin, |h| {
            h.with_radius(CORE_HAZARD_RADIUS)
                .with_spawn_duration(CORE_SPAWN_MS)
                .with_edges(EdgeMode::Clamp)
        }));
    }

    fn update(&mut self, dt: f32, player: Vec2, bounds: Bounds, rng: &mut SimRng) {
        let elapsed = self.core.elapsed_ms();
        let (firing, awake) = match self.emitter() {
            Some(h) if !h.is_dead() && !h.is_frozen() => (h.is_lethal(), true),
            _ => (false, false),
        };

        if awake {
            if let Some(h) = self.emitter() {
                self.origin = h.pos();
            }
            if firing && elapsed <= self.window_ms() {
                self.volley_acc_ms += dt * 1000.0;
                while self.volley_acc_ms >= VOLLEY_INTERVAL_MS {
                    self.volley_acc_ms -= VOLLEY_INTERVAL_MS;
                    self.fire(player, rng);
                }
            }
            self.phase += dt * 0.5;
        }

        self.core.update_all(dt, bounds, player, rng);

        // Bullets retire once they leave the arena; the core stays until a
        // weapon or the player deals with it
        let emitter = self.emitter;
        for hazard in self.core.hazards_mut() {
            if Some(hazard.id()) != emitter && hazard.is_lethal() && bounds.is_outside(hazard.pos(), HAZARD_RADIUS) {
                hazard.kill();
            }
        }
    }

    fn is_actively_spawning(&self) -> bool {
        self.emitter().is_some_and(|h| !h.is_dead() && !h.is_frozen())
            && self.core.elapsed_ms() <= self.window_ms()
    }

    /// Only a dead or frozen core with no bullets left ends the pattern
    fn is_complete(&self) -> bool {
        let core_down = self.emitter.is_some() && self.emitter().is_none_or(|h| h.is_dead() || h.is_frozen());
        core_down && self.bullets().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Difficulty;
    use crate::sim::pattern::PatternKind;
    use crate::sim::pattern::test_support::*;

    fn emitter(shape: EmitterShape, difficulty: Difficulty) -> CoreEmitter {
        CoreEmitter::new(core(PatternKind::CircleBurst, difficulty), shape)
    }

    fn step_until_volley(pattern: &mut CoreEmitter, player: Vec2, rng: &mut SimRng) {
        for _ in 0..600 {
            step(pattern, player, rng);
            if pattern.volleys() > 0 {
                return;
            }
        }
        panic!("no volley fired");
    }

    #[test]
    fn test_core_grows_in_at_an_anchor() {
        let mut rng = rng();
        let mut pattern = emitter(EmitterShape::CircleBurst, Difficulty::Medium);
        pattern.spawn(Vec2::ZERO, bounds(), &mut rng);
        let core = pattern.emitter().unwrap();
        assert_eq!(core.radius(), CORE_HAZARD_RADIUS);
        let p = core.pos();
        assert!(p.x == ANCHOR_MARGIN || p.x == 200.0 || p.x == 400.0 - ANCHOR_MARGIN);
        assert!(p.y == ANCHOR_MARGIN || p.y == 400.0 || p.y == 800.0 - ANCHOR_MARGIN);
        assert!(pattern.is_actively_spawning());

        run(&mut pattern, Vec2::new(-900.0, -900.0), 1.45, &mut rng);
        assert_eq!(pattern.volleys(), 0);
        assert_eq!(pattern.live_count(), 1);
    }

    #[test]
    fn test_circle_burst_volley() {
        let mut rng = rng();
        let mut pattern = emitter(EmitterShape::CircleBurst, Difficulty::Medium);
        pattern.spawn(Vec2::ZERO, bounds(), &mut rng);
        step_until_volley(&mut pattern, Vec2::new(-900.0, -900.0), &mut rng);
        assert!(pattern.core().elapsed_ms() >= CORE_SPAWN_MS);
        assert_eq!(pattern.live_count(), 17);
        assert!(pattern.core().live().all(|h| h.is_lethal()));
    }

    #[test]
    fn test_aimed_streams_target_player() {
        let mut rng = rng();
        let mut pattern = emitter(EmitterShape::AimedStreams, Difficulty::Hard);
        pattern.spawn(Vec2::ZERO, bounds(), &mut rng);
        let player = Vec2::new(200.0, 400.0);
        step_until_volley(&mut pattern, player, &mut rng);
        let origin = pattern.emitter().unwrap().pos();
        let centre_shot = &pattern.core().hazards()[3];
        let speed = centre_shot.vel().length();
        assert!((BULLET_SPEED * 0.9 - 1e-3..=BULLET_SPEED * 1.1 + 1e-3).contains(&speed));
        assert!(centre_shot.vel().normalize().dot((player - origin).normalize()) > 0.999);
    }

    #[test]
    fn test_frozen_core_stops_firing() {
        let mut rng = rng();
        let mut pattern = emitter(EmitterShape::Spiral, Difficulty::Medium);
        pattern.spawn(Vec2::ZERO, bounds(), &mut rng);
        step_until_volley(&mut pattern, Vec2::new(-900.0, -900.0), &mut rng);
        let id = pattern.emitter().unwrap().id();
        pattern.core_mut().get_mut(id).unwrap().freeze();
        assert!(!pattern.is_actively_spawning());

        let fired = pattern.volleys();
        run(&mut pattern, Vec2::new(-900.0, -900.0), 1.0, &mut rng);
        assert_eq!(pattern.volleys(), fired);
    }

    #[test]
    fn test_core_outlives_its_volleys() {
        let mut rng = rng();
        let mut pattern = emitter(EmitterShape::Spiral, Difficulty::Easy);
        pattern.spawn(Vec2::ZERO, bounds(), &mut rng);
        let far = Vec2::new(-900.0, -900.0);
        run(&mut pattern, far, 12.0, &mut rng);

        assert!(!pattern.is_actively_spawning());
        assert!(pattern.emitter().is_some_and(|h| h.is_lethal()));
        assert_eq!(pattern.live_count(), 1);
        assert!(!pattern.is_complete());

        let fired = pattern.volleys();
        run(&mut pattern, far, 5.0, &mut rng);
        assert_eq!(pattern.volleys(), fired);
        assert!(!pattern.is_complete());
    }

    #[test]
    fn test_completes_once_core_and_bullets_are_gone() {
        let mut rng = rng();
        let mut pattern = emitter(EmitterShape::CircleBurst, Difficulty::Medium);
        pattern.spawn(Vec2::ZERO, bounds(), &mut rng);
        let far = Vec2::new(-900.0, -900.0);
        step_until_volley(&mut pattern, far, &mut rng);
        let id = pattern.emitter().unwrap().id();
        pattern.core_mut().get_mut(id).unwrap().kill();

        // Bullets still in flight keep the pattern going
        step(&mut pattern, far, &mut rng);
        assert!(!pattern.is_complete());
        run(&mut pattern, far, 5.0, &mut rng);
        assert_eq!(pattern.live_count(), 0);
        assert!(pattern.is_complete());
    }
}
