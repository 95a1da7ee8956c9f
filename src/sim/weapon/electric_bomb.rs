//! Electric bomb: an orb the player can shove around for a moment, then a
//! chain reaction that arcs from hazard to hazard.

use std::collections::HashSet;

use glam::Vec2;

use super::chain::ChainReaction;
use super::{Orb, Weapon, WeaponBody, WeaponCore, WeaponKind, snapshot_ids};
use crate::sim::geom::Bounds;
use crate::sim::hazard::{Hazard, HazardId};
use crate::sim::player::Player;

const ROLL_MS: f32 = 1500.0;
const ORB_RADIUS: f32 = 12.0;
const PUSH_KICK: f32 = 1.5;
const INITIAL_RADIUS_FACTOR: f32 = 0.25;
const HOP_RADIUS_FACTOR: f32 = 0.10;
const MAX_DEPTH: u32 = 1000;

pub struct ElectricBomb {
    core: WeaponCore,
    orb: Orb,
    /// Hazards alive at activation; the only ones the chain may touch
    eligible: HashSet<HazardId>,
    chain: Option<ChainReaction>,
}

impl ElectricBomb {
    pub fn new() -> Self {
        Self {
            core: WeaponCore::new(),
            orb: Orb::new(Vec2::ZERO, ORB_RADIUS, PUSH_KICK),
            eligible: HashSet::new(),
            chain: None,
        }
    }

    pub fn chain(&self) -> Option<&ChainReaction> {
        self.chain.as_ref()
    }

    pub fn is_rolling(&self) -> bool {
        self.chain.is_none()
    }
}

impl Default for ElectricBomb {
    fn default() -> Self {
        Self::new()
    }
}

impl Weapon for ElectricBomb {
    fn kind(&self) -> WeaponKind {
        WeaponKind::ElectricBomb
    }

    fn core(&self) -> &WeaponCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WeaponCore {
        &mut self.core
    }

    fn activate(&mut self, player: &Player, hazards: &mut [&mut Hazard]) {
        self.orb = Orb::new(player.pos, ORB_RADIUS, PUSH_KICK);
        self.eligible = snapshot_ids(hazards);
        self.chain = None;
    }

    fn update(&mut self, dt: f32, _player: &Player, hazards: &mut [&mut Hazard], bounds: Bounds) {
        if let Some(chain) = &mut self.chain {
            let kills = chain.update(dt, hazards);
            self.core.credit(kills);
            return;
        }

        self.orb.roll(dt, bounds);
        if self.core.elapsed_ms() >= ROLL_MS {
            let eligible = std::mem::take(&mut self.eligible);
            let mut chain = ChainReaction::new(eligible, HOP_RADIUS_FACTOR * bounds.width, MAX_DEPTH);
            let kills = chain.ignite(self.orb.pos, INITIAL_RADIUS_FACTOR * bounds.width, hazards);
            self.core.credit(kills);
            self.chain = Some(chain);
        }
    }

    fn is_complete(&self) -> bool {
        self.chain.as_ref().is_some_and(ChainReaction::is_complete)
    }

    fn body(&self) -> Option<WeaponBody> {
        self.is_rolling().then(|| self.orb.body())
    }

    fn nudge(&mut self, player: &Player) -> bool {
        self.is_rolling() && self.orb.nudge(player, self.core.elapsed_ms())
    }

    fn clear(&mut self) {
        self.eligible.clear();
        self.chain = None;
    }
}
