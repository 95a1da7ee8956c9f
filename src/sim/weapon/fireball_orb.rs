//! Fireball orb: a burning orb the player can bat around. It scorches dots
//! near it and lays a fire trail that keeps burning long after the orb
//! fizzles out.

use glam::Vec2;

use super::{Orb, Weapon, WeaponBody, WeaponCore, WeaponKind, kill_within};
use crate::consts::WEAPON_ORB_RADIUS;
use crate::sim::geom::Bounds;
use crate::sim::hazard::Hazard;
use crate::sim::player::Player;

const ORB_RADIUS: f32 = WEAPON_ORB_RADIUS * 0.6;
const PUSH_KICK: f32 = 2.2;
const ACTIVE_MS: f32 = 2500.0;
const FIZZLE_MS: f32 = 300.0;
/// Extra reach added to every burn radius
const SCORCH_MARGIN: f32 = 5.0;
const FIRE_WIDTH: f32 = 12.0;
const FIRE_LIFETIME_MS: f32 = 10_000.0;
/// The trail only grows while the orb moves faster than this
const TRAIL_MIN_SPEED: f32 = 10.0;
const TRAIL_SPACING: f32 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirePoint {
    pub pos: Vec2,
    pub age_ms: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Stage {
    Drifting,
    Fizzling { since_ms: f32 },
    Done,
}

pub struct FireballOrb {
    core: WeaponCore,
    stage: Stage,
    orb: Orb,
    last_point: Vec2,
    trail: Vec<FirePoint>,
}

impl FireballOrb {
    pub fn new() -> Self {
        Self {
            core: WeaponCore::new(),
            stage: Stage::Drifting,
            orb: Orb::new(Vec2::ZERO, ORB_RADIUS, PUSH_KICK),
            last_point: Vec2::ZERO,
            trail: Vec::new(),
        }
    }

    pub fn is_drifting(&self) -> bool {
        self.stage == Stage::Drifting
    }

    pub fn trail(&self) -> &[FirePoint] {
        &self.trail
    }

    pub fn orb_pos(&self) -> Vec2 {
        self.orb.pos
    }
}

impl Default for FireballOrb {
    fn default() -> Self {
        Self::new()
    }
}

impl Weapon for FireballOrb {
    fn kind(&self) -> WeaponKind {
        WeaponKind::FireballOrb
    }

    fn core(&self) -> &WeaponCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WeaponCore {
        &mut self.core
    }

    /// The orb appears just ahead of a moving player, or above a still one
    fn activate(&mut self, player: &Player, _hazards: &mut [&mut Hazard]) {
        let offset = player.hitbox_radius + ORB_RADIUS + SCORCH_MARGIN;
        let ahead = if player.vel.length() > TRAIL_MIN_SPEED {
            player.vel.normalize()
        } else {
            Vec2::NEG_Y
        };
        self.orb = Orb::new(player.pos + ahead * offset, ORB_RADIUS, PUSH_KICK);
        self.last_point = self.orb.pos;
        self.trail.clear();
        self.stage = Stage::Drifting;
    }

    fn update(&mut self, dt: f32, _player: &Player, hazards: &mut [&mut Hazard], bounds: Bounds) {
        let dt_ms = dt * 1000.0;
        for point in &mut self.trail {
            point.age_ms += dt_ms;
        }
        self.trail.retain(|p| p.age_ms < FIRE_LIFETIME_MS);

        let mut kills = 0;
        match self.stage {
            Stage::Drifting => {
                self.orb.roll(dt, bounds);
                if self.orb.vel.length() > TRAIL_MIN_SPEED
                    && self.orb.pos.distance(self.last_point) >= TRAIL_SPACING
                {
                    self.trail.push(FirePoint { pos: self.orb.pos, age_ms: 0.0 });
                    self.last_point = self.orb.pos;
                }
                kills += kill_within(hazards, self.orb.pos, ORB_RADIUS * 1.5 + SCORCH_MARGIN);
                if self.core.elapsed_ms() >= ACTIVE_MS {
                    self.stage = Stage::Fizzling { since_ms: 0.0 };
                }
            }
            Stage::Fizzling { since_ms } => {
                let since_ms = since_ms + dt_ms;
                self.stage = if since_ms > FIZZLE_MS {
                    Stage::Done
                } else {
                    Stage::Fizzling { since_ms }
                };
            }
            Stage::Done => {}
        }

        for point in &self.trail {
            kills += kill_within(hazards, point.pos, FIRE_WIDTH + SCORCH_MARGIN);
        }
        self.core.credit(kills);
    }

    fn is_complete(&self) -> bool {
        self.stage == Stage::Done && self.trail.is_empty()
    }

    fn body(&self) -> Option<WeaponBody> {
        self.is_drifting().then(|| self.orb.body())
    }

    fn nudge(&mut self, player: &Player) -> bool {
        self.is_drifting() && self.orb.nudge(player, self.core.elapsed_ms())
    }

    fn clear(&mut self) {
        self.trail.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::weapon::test_support::*;

    #[test]
    fn test_spawns_ahead_of_player() {
        let mut player = player_at(Vec2::new(200.0, 400.0), 0.0);
        let mut hazards: Vec<Hazard> = Vec::new();
        let mut orb = FireballOrb::new();
        activate(&mut orb, &player, &mut hazards);
        let offset = player.hitbox_radius + ORB_RADIUS + SCORCH_MARGIN;
        assert_eq!(orb.orb_pos(), Vec2::new(200.0, 400.0 - offset));

        player.vel = Vec2::new(300.0, 0.0);
        activate(&mut orb, &player, &mut hazards);
        assert_eq!(orb.orb_pos(), Vec2::new(200.0 + offset, 400.0));
    }

    #[test]
    fn test_pushed_orb_lays_a_burning_trail() {
        let mut player = player_at(Vec2::new(100.0, 400.0), 0.0);
        player.vel = Vec2::new(100.0, 0.0);
        // One dot near the start of the path, one that drifts onto the trail later
        let mut hazards = hazards_at(&[Vec2::new(160.0, 410.0), Vec2::new(200.0, 600.0)]);
        let mut orb = FireballOrb::new();
        activate(&mut orb, &player, &mut hazards);
        assert!(orb.nudge(&player));
        run(&mut orb, &player, &mut hazards, 0.5);
        assert!(hazards[0].is_dead());
        assert!(!orb.trail().is_empty());
        assert!(!hazards[1].is_dead());

        let on_trail = orb.trail()[0].pos;
        hazards[1].place(on_trail + Vec2::new(0.0, FIRE_WIDTH));
        step(&mut orb, &player, &mut hazards);
        assert!(hazards[1].is_dead());
        assert_eq!(orb.killed_count(), 2);
    }

    #[test]
    fn test_fizzles_then_waits_for_fire() {
        let mut player = player_at(Vec2::new(100.0, 400.0), 0.0);
        player.vel = Vec2::new(100.0, 0.0);
        let mut hazards: Vec<Hazard> = Vec::new();
        let mut orb = FireballOrb::new();
        activate(&mut orb, &player, &mut hazards);
        orb.nudge(&player);
        run(&mut orb, &player, &mut hazards, 2.6);
        assert!(!orb.is_drifting());
        assert!(orb.body().is_none());
        run(&mut orb, &player, &mut hazards, 0.5);
        assert!(!orb.is_complete(), "trail still burning");
        run_to_completion(&mut orb, &player, &mut hazards, 11.0);
    }
}
