//! Weapon framework
//!
//! A weapon is a transient, time-boxed effect. It never owns hazards: every
//! tick it receives mutable references to the live hazards of all patterns
//! and may kill, freeze or push them. Weapons remember hazards by
//! [`HazardId`], never by reference, so nothing dangles across ticks.
//!
//! All timing is driven by `dt` through [`WeaponCore`].

mod blaster;
mod cannon;
pub mod chain;
mod chainsaw;
mod electric_bomb;
mod fireball_orb;
mod flame_burst;
mod homing_missile;
mod ice_bomb;
mod kinetic_bomb;
mod nuclear_bomb;
mod repellent;

pub use blaster::Blaster;
pub use cannon::{TeslaCannon, TripleCannon};
pub use chain::{ChainNode, ChainReaction};
pub use chainsaw::Chainsaw;
pub use electric_bomb::ElectricBomb;
pub use fireball_orb::FireballOrb;
pub use flame_burst::FlameBurst;
pub use homing_missile::HomingMissile;
pub use ice_bomb::IceBomb;
pub use kinetic_bomb::KineticBomb;
pub use nuclear_bomb::NuclearBomb;
pub use repellent::DotRepellent;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::{Bounds, bounce_in_bounds};
use super::hazard::{Hazard, HazardId};
use super::player::Player;

/// Registered weapon kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponKind {
    KineticBomb,
    IceBomb,
    NuclearBomb,
    ElectricBomb,
    TeslaCannon,
    TripleCannon,
    Blaster,
    HomingMissile,
    Chainsaw,
    DotRepellent,
    FlameBurst,
    FireballOrb,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 12] = [
        WeaponKind::KineticBomb,
        WeaponKind::IceBomb,
        WeaponKind::NuclearBomb,
        WeaponKind::ElectricBomb,
        WeaponKind::TeslaCannon,
        WeaponKind::TripleCannon,
        WeaponKind::Blaster,
        WeaponKind::HomingMissile,
        WeaponKind::Chainsaw,
        WeaponKind::DotRepellent,
        WeaponKind::FlameBurst,
        WeaponKind::FireballOrb,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponKind::KineticBomb => "KINETIC_BOMB",
            WeaponKind::IceBomb => "ICE_BOMB",
            WeaponKind::NuclearBomb => "NUCLEAR_BOMB",
            WeaponKind::ElectricBomb => "ELECTRIC_BOMB",
            WeaponKind::TeslaCannon => "TESLA_CANNON",
            WeaponKind::TripleCannon => "TRIPLE_CANNON",
            WeaponKind::Blaster => "BLASTER",
            WeaponKind::HomingMissile => "HOMING_MISSILE",
            WeaponKind::Chainsaw => "CHAINSAW",
            WeaponKind::DotRepellent => "DOT_REPELLENT",
            WeaponKind::FlameBurst => "FLAME_BURST",
            WeaponKind::FireballOrb => "FIREBALL_ORB",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str().eq_ignore_ascii_case(s))
    }
}

/// Elapsed time and kill counter shared by every weapon
#[derive(Debug, Clone, Copy, Default)]
pub struct WeaponCore {
    elapsed_ms: f32,
    kills: u32,
}

impl WeaponCore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }

    pub fn tick(&mut self, dt: f32) {
        self.elapsed_ms += dt * 1000.0;
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    /// Record kills. The counter never decreases.
    pub fn credit(&mut self, kills: u32) {
        self.kills = self.kills.saturating_add(kills);
    }
}

/// A solid body the player can touch (rolling orbs)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponBody {
    pub pos: Vec2,
    pub radius: f32,
}

/// A time-boxed hazard-clearing effect
pub trait Weapon {
    fn kind(&self) -> WeaponKind;

    fn core(&self) -> &WeaponCore;

    fn core_mut(&mut self) -> &mut WeaponCore;

    /// Capture what the effect needs from the player and the live hazards
    fn activate(&mut self, player: &Player, hazards: &mut [&mut Hazard]);

    /// Advance the effect state machine
    fn update(&mut self, dt: f32, player: &Player, hazards: &mut [&mut Hazard], bounds: Bounds);

    /// Terminal state reached and every fade timer has run out
    fn is_complete(&self) -> bool;

    fn tick(&mut self, dt: f32) {
        self.core_mut().tick(dt);
    }

    fn killed_count(&self) -> u32 {
        self.core().kills()
    }

    /// Body the player can push around, if any
    fn body(&self) -> Option<WeaponBody> {
        None
    }

    /// Player touched [`Weapon::body`]. Returns true if the body moved.
    fn nudge(&mut self, _player: &Player) -> bool {
        false
    }

    /// The effect has caught the player (nuclear blast)
    fn endangers_player(&self) -> bool {
        false
    }

    /// Drop every sub-entity immediately
    fn clear(&mut self) {}
}

/// Kill every hazard still alive within `radius` of `center` (inclusive)
pub(crate) fn kill_within(hazards: &mut [&mut Hazard], center: Vec2, radius: f32) -> u32 {
    let mut kills = 0;
    for hazard in hazards.iter_mut() {
        if !hazard.is_dead() && hazard.pos().distance(center) <= radius {
            hazard.kill();
            kills += 1;
        }
    }
    kills
}

/// Ids of every hazard alive right now
pub(crate) fn snapshot_ids(hazards: &[&mut Hazard]) -> std::collections::HashSet<HazardId> {
    hazards.iter().filter(|h| !h.is_dead()).map(|h| h.id()).collect()
}

/// Rolling orb shared by nudgeable weapons: bounces off the walls and takes a
/// push from the player at most once per cooldown.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Orb {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Velocity multiplier applied to a push
    kick: f32,
    last_nudge_ms: Option<f32>,
}

impl Orb {
    const NUDGE_COOLDOWN_MS: f32 = 100.0;
    const MIN_PUSH_SPEED: f32 = 50.0;

    pub fn new(pos: Vec2, radius: f32, kick: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            kick,
            last_nudge_ms: None,
        }
    }

    pub fn body(&self) -> WeaponBody {
        WeaponBody {
            pos: self.pos,
            radius: self.radius,
        }
    }

    pub fn roll(&mut self, dt: f32, bounds: Bounds) {
        self.pos += self.vel * dt;
        bounce_in_bounds(&mut self.pos, &mut self.vel, self.radius, bounds);
    }

    /// Glancing pushes deflect the orb; direct pushes launch it along the
    /// player's velocity.
    pub fn nudge(&mut self, player: &Player, now_ms: f32) -> bool {
        if self
            .last_nudge_ms
            .is_some_and(|last| now_ms - last < Self::NUDGE_COOLDOWN_MS)
        {
            return false;
        }
        self.last_nudge_ms = Some(now_ms);

        let v = player.vel;
        let speed = v.length();
        if speed < Self::MIN_PUSH_SPEED {
            return false;
        }
        let Some(n) = (self.pos - player.pos).try_normalize() else {
            self.vel = v;
            return true;
        };
        let t = n.perp();
        let along = v.dot(n);
        let across = v.dot(t);
        let directness = along / speed;
        if directness < 0.1 {
            return false;
        }
        self.vel = if directness > 0.7 {
            v * self.kick
        } else {
            (n * along * directness + t * across * (1.0 - directness)) * self.kick
        };
        true
    }
}
