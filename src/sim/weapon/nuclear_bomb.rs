//! Nuclear bomb: an orb keeps the player's momentum, ricochets around the
//! arena and detonates on its second wall hit or when the fuse runs out.
//! The blast kills the player too if they are caught inside it.

use glam::Vec2;

use super::{Weapon, WeaponCore, WeaponKind, kill_within};
use crate::sim::geom::{Bounds, bounce_in_bounds};
use crate::sim::hazard::Hazard;
use crate::sim::player::Player;

const FUSE_MS: f32 = 3000.0;
const WALL_HITS_TO_DETONATE: u32 = 2;
const BLAST_MS: f32 = 500.0;
const RADIUS_FACTOR: f32 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Stage {
    Rolling { wall_hits: u32 },
    Exploding { since_ms: f32 },
    Done,
}

pub struct NuclearBomb {
    core: WeaponCore,
    stage: Stage,
    orb: Vec2,
    vel: Vec2,
    radius: f32,
    caught_player: bool,
}

impl NuclearBomb {
    pub fn new() -> Self {
        Self {
            core: WeaponCore::new(),
            stage: Stage::Rolling { wall_hits: 0 },
            orb: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: 0.0,
            caught_player: false,
        }
    }

    pub fn orb(&self) -> Vec2 {
        self.orb
    }

    pub fn is_exploding(&self) -> bool {
        matches!(self.stage, Stage::Exploding { .. })
    }

    fn detonate(&mut self, bounds: Bounds) {
        self.radius = RADIUS_FACTOR * bounds.width;
        self.stage = Stage::Exploding { since_ms: 0.0 };
        log::info!("nuclear bomb detonated at {:?}", self.orb);
    }
}

impl Default for NuclearBomb {
    fn default() -> Self {
        Self::new()
    }
}

impl Weapon for NuclearBomb {
    fn kind(&self) -> WeaponKind {
        WeaponKind::NuclearBomb
    }

    fn core(&self) -> &WeaponCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WeaponCore {
        &mut self.core
    }

    fn activate(&mut self, player: &Player, _hazards: &mut [&mut Hazard]) {
        self.orb = player.pos;
        self.vel = player.vel;
        self.stage = Stage::Rolling { wall_hits: 0 };
    }

    fn update(&mut self, dt: f32, player: &Player, hazards: &mut [&mut Hazard], bounds: Bounds) {
        match self.stage {
            Stage::Rolling { wall_hits } => {
                self.orb += self.vel * dt;
                let hit = bounce_in_bounds(&mut self.orb, &mut self.vel, 0.0, bounds);
                let wall_hits = wall_hits + u32::from(hit && self.vel != Vec2::ZERO);
                self.stage = Stage::Rolling { wall_hits };
                if wall_hits >= WALL_HITS_TO_DETONATE || self.core.elapsed_ms() >= FUSE_MS {
                    self.detonate(bounds);
                }
            }
            Stage::Exploding { since_ms } => {
                let kills = kill_within(hazards, self.orb, self.radius);
                self.core.credit(kills);
                if player.pos.distance(self.orb) <= self.radius {
                    self.caught_player = true;
                }
                let since_ms = since_ms + dt * 1000.0;
                self.stage = if since_ms > BLAST_MS {
                    Stage::Done
                } else {
                    Stage::Exploding { since_ms }
                };
            }
            Stage::Done => {}
        }
    }

    fn is_complete(&self) -> bool {
        self.stage == Stage::Done
    }

    fn endangers_player(&self) -> bool {
        self.caught_player
    }
}
