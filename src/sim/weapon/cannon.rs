//! Cannons: after a short aim, three shells are fired 250 ms apart along the
//! player's current heading. A shell bursts on the first hazard it touches
//! or when it leaves the arena.
//!
//! - [`TripleCannon`] fires forward; each burst is a short-lived blast.
//! - [`TeslaCannon`] fires backward; each burst ignites a shallow chain
//!   reaction.

use std::collections::HashSet;
use std::f32::consts::PI;

use glam::Vec2;

use super::chain::ChainReaction;
use super::{Weapon, WeaponCore, WeaponKind, snapshot_ids};
use crate::heading_vector;
use crate::sim::geom::{Bounds, circles_overlap};
use crate::sim::hazard::{Hazard, HazardId};
use crate::sim::player::Player;

const AIM_MS: f32 = 500.0;
const SHOTS: u32 = 3;
const SHOT_DELAY_MS: f32 = 250.0;
const SHELL_SPEED: f32 = 800.0;
const SHELL_RADIUS: f32 = 8.0;

/// Aim-then-fire timeline shared by both cannons
#[derive(Debug, Clone, Copy, Default)]
struct Salvo {
    fired: u32,
    last_shot_ms: f32,
}

impl Salvo {
    /// Fire the next shell if one is due
    fn poll(&mut self, now_ms: f32, player: &Player, heading_offset: f32) -> Option<Shell> {
        let due = match self.fired {
            0 => now_ms >= AIM_MS,
            n if n < SHOTS => now_ms - self.last_shot_ms >= SHOT_DELAY_MS,
            _ => false,
        };
        if !due {
            return None;
        }
        self.fired += 1;
        self.last_shot_ms = now_ms;
        Some(Shell {
            pos: player.pos,
            vel: heading_vector(player.heading + heading_offset) * SHELL_SPEED,
        })
    }

    fn is_spent(&self) -> bool {
        self.fired >= SHOTS
    }
}

#[derive(Debug, Clone, Copy)]
struct Shell {
    pos: Vec2,
    vel: Vec2,
}

impl Shell {
    /// Move one step. Returns `Some(kills)` once the shell bursts, having
    /// destroyed the hazard it struck, if any. Hazards rejected by
    /// `can_hit` are passed through.
    fn fly(
        &mut self,
        dt: f32,
        hazards: &mut [&mut Hazard],
        bounds: Bounds,
        can_hit: impl Fn(HazardId) -> bool,
    ) -> Option<u32> {
        self.pos += self.vel * dt;
        if let Some(struck) = hazards.iter_mut().find(|h| {
            h.is_collidable()
                && can_hit(h.id())
                && circles_overlap(self.pos, SHELL_RADIUS, h.pos(), h.radius())
        }) {
            struck.kill();
            return Some(1);
        }
        bounds.is_outside(self.pos, 0.0).then_some(0)
    }
}

const BLAST_RADIUS: f32 = 60.0;
const BLAST_MS: f32 = 300.0;

#[derive(Debug, Clone, Copy)]
enum Round {
    Flying(Shell),
    Blast { center: Vec2, since_ms: f32 },
}

pub struct TripleCannon {
    core: WeaponCore,
    salvo: Salvo,
    rounds: Vec<Round>,
}

impl TripleCannon {
    pub fn new() -> Self {
        Self {
            core: WeaponCore::new(),
            salvo: Salvo::default(),
            rounds: Vec::with_capacity(SHOTS as usize),
        }
    }

    pub fn shots_fired(&self) -> u32 {
        self.salvo.fired
    }
}

impl Default for TripleCannon {
    fn default() -> Self {
        Self::new()
    }
}

impl Weapon for TripleCannon {
    fn kind(&self) -> WeaponKind {
        WeaponKind::TripleCannon
    }

    fn core(&self) -> &WeaponCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WeaponCore {
        &mut self.core
    }

    fn activate(&mut self, _player: &Player, _hazards: &mut [&mut Hazard]) {
        self.salvo = Salvo::default();
        self.rounds.clear();
    }

    fn update(&mut self, dt: f32, player: &Player, hazards: &mut [&mut Hazard], bounds: Bounds) {
        if let Some(shell) = self.salvo.poll(self.core.elapsed_ms(), player, 0.0) {
            self.rounds.push(Round::Flying(shell));
        }

        let mut kills = 0;
        for round in &mut self.rounds {
            match round {
                Round::Flying(shell) => {
                    if let Some(hit) = shell.fly(dt, hazards, bounds, |_| true) {
                        kills += hit;
                        *round = Round::Blast { center: shell.pos, since_ms: 0.0 };
                    }
                }
                Round::Blast { center, since_ms } => {
                    if *since_ms < BLAST_MS {
                        for hazard in hazards.iter_mut() {
                            if !hazard.is_dead()
                                && circles_overlap(*center, BLAST_RADIUS, hazard.pos(), hazard.radius())
                            {
                                hazard.kill();
                                kills += 1;
                            }
                        }
                    }
                    *since_ms += dt * 1000.0;
                }
            }
        }
        self.core.credit(kills);
    }

    fn is_complete(&self) -> bool {
        self.salvo.is_spent()
            && self
                .rounds
                .iter()
                .all(|r| matches!(r, Round::Blast { since_ms, .. } if *since_ms >= BLAST_MS))
    }

    fn clear(&mut self) {
        self.rounds.clear();
    }
}

const TESLA_INITIAL_RADIUS_FACTOR: f32 = 0.25;
const TESLA_HOP_RADIUS_FACTOR: f32 = 0.10;
const TESLA_MAX_DEPTH: u32 = 5;

pub struct TeslaCannon {
    core: WeaponCore,
    salvo: Salvo,
    eligible: HashSet<HazardId>,
    shells: Vec<Shell>,
    chains: Vec<ChainReaction>,
}

impl TeslaCannon {
    pub fn new() -> Self {
        Self {
            core: WeaponCore::new(),
            salvo: Salvo::default(),
            eligible: HashSet::new(),
            shells: Vec::new(),
            chains: Vec::new(),
        }
    }

    pub fn chains(&self) -> &[ChainReaction] {
        &self.chains
    }
}

impl Default for TeslaCannon {
    fn default() -> Self {
        Self::new()
    }
}

impl Weapon for TeslaCannon {
    fn kind(&self) -> WeaponKind {
        WeaponKind::TeslaCannon
    }

    fn core(&self) -> &WeaponCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WeaponCore {
        &mut self.core
    }

    fn activate(&mut self, _player: &Player, hazards: &mut [&mut Hazard]) {
        self.salvo = Salvo::default();
        self.eligible = snapshot_ids(hazards);
        self.shells.clear();
        self.chains.clear();
    }

    fn update(&mut self, dt: f32, player: &Player, hazards: &mut [&mut Hazard], bounds: Bounds) {
        if let Some(shell) = self.salvo.poll(self.core.elapsed_ms(), player, PI) {
            self.shells.push(shell);
        }

        let mut kills = 0;
        for chain in &mut self.chains {
            kills += chain.update(dt, hazards);
        }

        // Only hazards present at activation can be struck
        let eligible = &self.eligible;
        let mut index = 0;
        while index < self.shells.len() {
            let Some(hit) = self.shells[index].fly(dt, hazards, bounds, |id| eligible.contains(&id)) else {
                index += 1;
                continue;
            };
            let shell = self.shells.swap_remove(index);
            kills += hit;
            let mut chain = ChainReaction::new(
                eligible.clone(),
                TESLA_HOP_RADIUS_FACTOR * bounds.width,
                TESLA_MAX_DEPTH,
            );
            kills += chain.ignite(shell.pos, TESLA_INITIAL_RADIUS_FACTOR * bounds.width, hazards);
            self.chains.push(chain);
        }
        self.core.credit(kills);
    }

    fn is_complete(&self) -> bool {
        self.salvo.is_spent() && self.shells.is_empty() && self.chains.iter().all(ChainReaction::is_complete)
    }

    fn clear(&mut self) {
        self.shells.clear();
        self.chains.clear();
    }
}
