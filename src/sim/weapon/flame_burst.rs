//! Flame burst: a cone of fire in front of the player that burns every dot
//! it reaches. Embers are left behind and fade after the flame stops; they
//! are cosmetic.

use glam::Vec2;

use super::{Weapon, WeaponCore, WeaponKind};
use crate::sim::geom::Bounds;
use crate::sim::hazard::Hazard;
use crate::sim::player::Player;
use crate::{normalize_angle, polar_to_cartesian};

const DURATION_MS: f32 = 3000.0;
const HALF_CONE: f32 = std::f32::consts::PI / 6.0;
const REACH: f32 = 200.0;
const EMBER_INTERVAL_MS: f32 = 50.0;
const EMBER_LIFETIME_MS: f32 = 1000.0;
/// Embers settle between these distances ahead of the player
const EMBER_NEAR: f32 = 20.0;
const EMBER_FAR: f32 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ember {
    pub pos: Vec2,
    pub age_ms: f32,
}

#[derive(Default)]
pub struct FlameBurst {
    core: WeaponCore,
    embers: Vec<Ember>,
    since_ember_ms: f32,
    dropped: u32,
}

impl FlameBurst {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_burning(&self) -> bool {
        self.core.elapsed_ms() < DURATION_MS
    }

    pub fn embers(&self) -> &[Ember] {
        &self.embers
    }

    /// Embers sweep across the cone and back out along it
    fn drop_ember(&mut self, player: &Player) {
        let n = self.dropped as f32;
        let spread = (n * 0.7).sin() * HALF_CONE;
        let distance = EMBER_NEAR + (EMBER_FAR - EMBER_NEAR) * (0.5 + 0.5 * (n * 1.3).cos());
        self.embers.push(Ember {
            pos: player.pos + polar_to_cartesian(distance, player.heading + spread),
            age_ms: 0.0,
        });
        self.dropped += 1;
    }
}

/// Inside the cone of reach `REACH` and half-angle `HALF_CONE` around `heading`
fn in_cone(origin: Vec2, heading: f32, pos: Vec2) -> bool {
    let to = pos - origin;
    if to.length() > REACH {
        return false;
    }
    if to == Vec2::ZERO {
        return true;
    }
    normalize_angle(to.y.atan2(to.x) - heading).abs() <= HALF_CONE
}

impl Weapon for FlameBurst {
    fn kind(&self) -> WeaponKind {
        WeaponKind::FlameBurst
    }

    fn core(&self) -> &WeaponCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WeaponCore {
        &mut self.core
    }

    fn activate(&mut self, _player: &Player, _hazards: &mut [&mut Hazard]) {
        self.embers.clear();
        self.since_ember_ms = 0.0;
        self.dropped = 0;
    }

    fn update(&mut self, dt: f32, player: &Player, hazards: &mut [&mut Hazard], _bounds: Bounds) {
        let dt_ms = dt * 1000.0;
        for ember in &mut self.embers {
            ember.age_ms += dt_ms;
        }
        self.embers.retain(|e| e.age_ms < EMBER_LIFETIME_MS);

        if !self.is_burning() {
            return;
        }

        self.since_ember_ms += dt_ms;
        while self.since_ember_ms >= EMBER_INTERVAL_MS {
            self.since_ember_ms -= EMBER_INTERVAL_MS;
            self.drop_ember(player);
        }

        let mut kills = 0;
        for hazard in hazards.iter_mut() {
            if !hazard.is_dead() && in_cone(player.pos, player.heading, hazard.pos()) {
                hazard.kill();
                kills += 1;
            }
        }
        self.core.credit(kills);
    }

    fn is_complete(&self) -> bool {
        !self.is_burning() && self.embers.is_empty()
    }

    fn clear(&mut self) {
        self.embers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::weapon::test_support::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_cone_shape() {
        let origin = Vec2::new(200.0, 400.0);
        assert!(in_cone(origin, 0.0, origin + Vec2::new(199.0, 0.0)));
        assert!(!in_cone(origin, 0.0, origin + Vec2::new(201.0, 0.0)));
        assert!(in_cone(origin, 0.0, origin + polar_to_cartesian(100.0, 0.5)));
        assert!(!in_cone(origin, 0.0, origin + polar_to_cartesian(100.0, 0.55)));
        assert!(!in_cone(origin, 0.0, origin + Vec2::new(-50.0, 0.0)));
        // Wraps across ±π
        assert!(in_cone(origin, std::f32::consts::PI, origin + Vec2::new(-50.0, 1.0)));
    }

    #[test]
    fn test_burns_ahead_and_follows_heading() {
        let mut player = player_at(Vec2::new(200.0, 400.0), -FRAC_PI_2);
        let mut hazards = hazards_at(&[Vec2::new(200.0, 300.0), Vec2::new(200.0, 500.0)]);
        let mut flame = FlameBurst::new();
        activate(&mut flame, &player, &mut hazards);
        step(&mut flame, &player, &mut hazards);
        assert!(hazards[0].is_dead());
        assert!(!hazards[1].is_dead());

        player.heading = FRAC_PI_2;
        step(&mut flame, &player, &mut hazards);
        assert!(hazards[1].is_dead());
        assert_eq!(flame.killed_count(), 2);
    }

    #[test]
    fn test_embers_outlast_the_flame() {
        let player = player_at(Vec2::new(200.0, 400.0), 0.0);
        let mut hazards: Vec<Hazard> = Vec::new();
        let mut flame = FlameBurst::new();
        activate(&mut flame, &player, &mut hazards);
        run(&mut flame, &player, &mut hazards, 1.0);
        assert!(!flame.embers().is_empty());
        for ember in flame.embers() {
            assert!(in_cone(player.pos, player.heading, ember.pos));
        }

        run(&mut flame, &player, &mut hazards, 2.1);
        assert!(!flame.is_burning());
        assert!(!flame.is_complete());
        let ticks = run_to_completion(&mut flame, &player, &mut hazards, 2.0);
        assert!(ticks > 40);
    }
}
