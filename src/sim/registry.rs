//! Name to constructor lookup for patterns and weapons
//!
//! The simulation receives both registries at construction and never reaches
//! for global state. Entries are kept in a `BTreeMap` so iteration order (and
//! therefore seeded pattern selection) is stable.

use std::collections::BTreeMap;
use std::fmt;

use super::Difficulty;
use super::hazard::PatternTag;
use super::pattern::{
    BouncingBall, BulletHell, ClockSweep, ContainmentRing, CoreEmitter, Cyclone, EmitterShape,
    GatlingPoint, GridLayout, Pattern, PatternCore, PatternKind, SparseGrid, SweeperLine, ZombieSnow,
};
use super::weapon::{
    Blaster, Chainsaw, DotRepellent, ElectricBomb, FireballOrb, FlameBurst, HomingMissile, IceBomb,
    KineticBomb, NuclearBomb, TeslaCannon, TripleCannon, Weapon, WeaponKind,
};
use crate::SimError;

type PatternFactory = Box<dyn Fn(PatternCore) -> Box<dyn Pattern>>;
type WeaponFactory = Box<dyn Fn() -> Box<dyn Weapon>>;

#[derive(Default)]
pub struct PatternRegistry {
    entries: BTreeMap<PatternKind, PatternFactory>,
}

impl fmt::Debug for PatternRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternRegistry")
            .field("kinds", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl PatternRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in pattern
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(PatternKind::ZombieSnow, |core| Box::new(ZombieSnow::new(core)));
        registry.register(PatternKind::SweeperLine, |core| Box::new(SweeperLine::new(core)));
        registry.register(PatternKind::SparseGrid, |core| {
            Box::new(SparseGrid::new(core, GridLayout::Sparse))
        });
        registry.register(PatternKind::UltraSparseGrid, |core| {
            Box::new(SparseGrid::new(core, GridLayout::UltraSparse))
        });
        registry.register(PatternKind::BouncingBall, |core| Box::new(BouncingBall::new(core)));
        registry.register(PatternKind::GatlingPoint, |core| Box::new(GatlingPoint::new(core)));
        registry.register(PatternKind::BulletHell, |core| Box::new(BulletHell::new(core)));
        registry.register(PatternKind::ContainmentRing, |core| {
            Box::new(ContainmentRing::new(core))
        });
        registry.register(PatternKind::Cyclone, |core| Box::new(Cyclone::new(core)));
        registry.register(PatternKind::ClockSweep, |core| Box::new(ClockSweep::new(core)));
        for (kind, shape) in [
            (PatternKind::Spiral, EmitterShape::Spiral),
            (PatternKind::CircleBurst, EmitterShape::CircleBurst),
            (PatternKind::AimedStreams, EmitterShape::AimedStreams),
            (PatternKind::Wave, EmitterShape::Wave),
        ] {
            registry.register(kind, move |core| Box::new(CoreEmitter::new(core, shape)));
        }
        registry
    }

    /// Register (or replace) the constructor for a kind
    pub fn register<F>(&mut self, kind: PatternKind, factory: F)
    where
        F: Fn(PatternCore) -> Box<dyn Pattern> + 'static,
    {
        self.entries.insert(kind, Box::new(factory));
    }

    pub fn contains(&self, kind: PatternKind) -> bool {
        self.entries.contains_key(&kind)
    }

    /// Registered kinds in stable order
    pub fn kinds(&self) -> impl Iterator<Item = PatternKind> + '_ {
        self.entries.keys().copied()
    }

    pub fn create(
        &self,
        kind: PatternKind,
        tag: PatternTag,
        difficulty: Difficulty,
    ) -> Result<Box<dyn Pattern>, SimError> {
        let factory = self
            .entries
            .get(&kind)
            .ok_or_else(|| SimError::UnknownPattern(kind.as_str().to_string()))?;
        Ok(factory(PatternCore::new(tag, difficulty)))
    }

    /// Resolve a pattern id such as `"CLOCK_SWEEP"`
    pub fn resolve(&self, id: &str) -> Result<PatternKind, SimError> {
        match PatternKind::from_str(id).filter(|kind| self.contains(*kind)) {
            Some(kind) => Ok(kind),
            None => {
                log::warn!("Unknown pattern id: {id}");
                Err(SimError::UnknownPattern(id.to_string()))
            }
        }
    }
}

#[derive(Default)]
pub struct WeaponRegistry {
    entries: BTreeMap<WeaponKind, WeaponFactory>,
}

impl fmt::Debug for WeaponRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeaponRegistry")
            .field("kinds", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl WeaponRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in weapon
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(WeaponKind::KineticBomb, || Box::new(KineticBomb::new()));
        registry.register(WeaponKind::IceBomb, || Box::new(IceBomb::new()));
        registry.register(WeaponKind::NuclearBomb, || Box::new(NuclearBomb::new()));
        registry.register(WeaponKind::ElectricBomb, || Box::new(ElectricBomb::new()));
        registry.register(WeaponKind::TeslaCannon, || Box::new(TeslaCannon::new()));
        registry.register(WeaponKind::TripleCannon, || Box::new(TripleCannon::new()));
        registry.register(WeaponKind::Blaster, || Box::new(Blaster::new()));
        registry.register(WeaponKind::HomingMissile, || Box::new(HomingMissile::new()));
        registry.register(WeaponKind::Chainsaw, || Box::new(Chainsaw::new()));
        registry.register(WeaponKind::DotRepellent, || Box::new(DotRepellent::new()));
        registry.register(WeaponKind::FlameBurst, || Box::new(FlameBurst::new()));
        registry.register(WeaponKind::FireballOrb, || Box::new(FireballOrb::new()));
        registry
    }

    pub fn register<F>(&mut self, kind: WeaponKind, factory: F)
    where
        F: Fn() -> Box<dyn Weapon> + 'static,
    {
        self.entries.insert(kind, Box::new(factory));
    }

    pub fn contains(&self, kind: WeaponKind) -> bool {
        self.entries.contains_key(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = WeaponKind> + '_ {
        self.entries.keys().copied()
    }

    pub fn create(&self, kind: WeaponKind) -> Result<Box<dyn Weapon>, SimError> {
        let factory = self
            .entries
            .get(&kind)
            .ok_or_else(|| SimError::UnknownWeapon(kind.as_str().to_string()))?;
        Ok(factory())
    }

    /// Resolve a weapon id such as `"ICE_BOMB"`
    pub fn resolve(&self, id: &str) -> Result<WeaponKind, SimError> {
        match WeaponKind::from_str(id).filter(|kind| self.contains(*kind)) {
            Some(kind) => Ok(kind),
            None => {
                log::warn!("Unknown weapon id: {id}");
                Err(SimError::UnknownWeapon(id.to_string()))
            }
        }
    }
}
