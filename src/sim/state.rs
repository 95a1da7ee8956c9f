//! Simulation state and the orchestrator's entry points
//!
//! [`Simulation`] owns every pattern, weapon and pickup of a run together
//! with the seeded RNG. The per-tick pipeline lives in [`super::tick`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::collision::SpatialGrid;
use super::geom::{Bounds, EdgeMode};
use super::hazard::{Hazard, HazardId, PatternTag};
use super::input::TickInput;
use super::pattern::{Pattern, PatternKind};
use super::pickup::PickupField;
use super::player::Player;
use super::registry::{PatternRegistry, WeaponRegistry};
use super::scoring::Scoring;
use super::weapon::{Weapon, WeaponKind};
use super::{Difficulty, SimRng};
use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::{Settings, SimError};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Playing,
    GameOver,
}

/// Opaque id of an activated weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WeaponHandle(pub u32);

/// Things the orchestrator may want to show or log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    PatternSpawned { tag: PatternTag, difficulty: Difficulty },
    PatternCompleted { tag: PatternTag },
    WeaponActivated { handle: WeaponHandle, kind: WeaponKind },
    WeaponFinished { handle: WeaponHandle, kind: WeaponKind, kills: u32 },
    /// The player ran into a frozen hazard
    HazardShattered { id: HazardId, pos: Vec2 },
    /// `by` is `None` when the player was caught in a weapon blast
    PlayerKilled { by: Option<HazardId>, pos: Vec2 },
}

pub(crate) struct ActiveWeapon {
    pub handle: WeaponHandle,
    pub weapon: Box<dyn Weapon>,
}

/// A complete run
pub struct Simulation {
    pub settings: Settings,
    pub bounds: Bounds,
    pub player: Player,
    pub phase: Phase,
    pub scoring: Scoring,
    pub pickups: PickupField,
    /// Broad-phase index, rebuilt every tick
    pub grid: SpatialGrid,
    pub(crate) patterns: Vec<Box<dyn Pattern>>,
    pub(crate) weapons: Vec<ActiveWeapon>,
    pub(crate) pattern_registry: PatternRegistry,
    pub(crate) weapon_registry: WeaponRegistry,
    pub(crate) rng: SimRng,
    /// Applied at the start of the next tick
    pub(crate) pending_bounds: Option<Bounds>,
    /// Countdown to the next scheduled pattern (ms)
    pub(crate) pattern_timer_ms: f32,
    /// Time nothing has been actively spawning (ms)
    pub(crate) idle_ms: f32,
    pub(crate) events: Vec<SimEvent>,
    next_instance: u32,
    next_handle: u32,
}

impl Simulation {
    /// New run; both registries are supplied by the caller. An unusable
    /// arena size falls back to the default arena.
    pub fn new(settings: Settings, patterns: PatternRegistry, weapons: WeaponRegistry) -> Self {
        let mut bounds = Bounds::new(settings.arena_width, settings.arena_height);
        if !bounds.is_valid() {
            log::warn!(
                "Ignoring invalid arena size {}x{}, using {ARENA_WIDTH}x{ARENA_HEIGHT}",
                bounds.width,
                bounds.height
            );
            bounds = Bounds::new(ARENA_WIDTH, ARENA_HEIGHT);
        }
        Self {
            bounds,
            player: Player::new(bounds.center()),
            phase: Phase::Playing,
            scoring: Scoring::new(),
            pickups: PickupField::from_settings(&settings),
            grid: SpatialGrid::new(),
            patterns: Vec::new(),
            weapons: Vec::new(),
            pattern_registry: patterns,
            weapon_registry: weapons,
            rng: SimRng::seed_from_u64(settings.seed),
            pending_bounds: None,
            pattern_timer_ms: settings.first_pattern_delay_ms,
            idle_ms: 0.0,
            events: Vec::new(),
            next_instance: 1,
            next_handle: 1,
            settings,
        }
    }

    /// New run with every built-in pattern and weapon
    pub fn with_defaults(settings: Settings) -> Self {
        Self::new(settings, PatternRegistry::with_defaults(), WeaponRegistry::with_defaults())
    }

    /// Run exactly one fixed tick
    pub fn advance(&mut self, input: &TickInput, dt: f32) {
        super::tick::tick(self, input, dt);
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn score(&self) -> u64 {
        self.scoring.score()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.settings.difficulty_for_score(self.score())
    }

    /// Every hazard that is not dead, in pattern then spawn order
    pub fn live_hazards(&self) -> impl Iterator<Item = &Hazard> + '_ {
        self.patterns.iter().flat_map(|p| p.core().live())
    }

    pub fn patterns(&self) -> impl Iterator<Item = &dyn Pattern> + '_ {
        self.patterns.iter().map(|p| p.as_ref())
    }

    pub fn active_pattern_kinds(&self) -> Vec<PatternKind> {
        self.patterns.iter().map(|p| p.kind()).collect()
    }

    pub fn weapons(&self) -> impl Iterator<Item = (WeaponHandle, &dyn Weapon)> + '_ {
        self.weapons.iter().map(|w| (w.handle, w.weapon.as_ref()))
    }

    pub fn weapon(&self, handle: WeaponHandle) -> Option<&dyn Weapon> {
        self.weapons
            .iter()
            .find(|w| w.handle == handle)
            .map(|w| w.weapon.as_ref())
    }

    /// Create, start and spawn a pattern at the current difficulty.
    /// Returns the new instance's tag.
    pub fn spawn_pattern(&mut self, kind: PatternKind, origin: Vec2) -> Result<PatternTag, SimError> {
        let tag = PatternTag {
            kind,
            instance: self.next_instance,
        };
        let difficulty = self.difficulty();
        let mut pattern = match self.pattern_registry.create(kind, tag, difficulty) {
            Ok(pattern) => pattern,
            Err(err) => {
                log::warn!("Cannot spawn pattern: {err}");
                return Err(err);
            }
        };
        self.next_instance = self.next_instance.wrapping_add(1);

        pattern.core_mut().set_edges(EdgeMode::arena(self.settings.wrap));
        pattern.start();
        pattern.spawn(origin, self.bounds, &mut self.rng);
        log::info!(
            "Pattern {} #{} spawned ({difficulty:?}, {} hazards)",
            kind.as_str(),
            tag.instance,
            pattern.live_count()
        );
        self.patterns.push(pattern);
        self.events.push(SimEvent::PatternSpawned { tag, difficulty });
        Ok(tag)
    }

    /// Pick uniformly among `available` kinds that are registered and not
    /// already running
    pub fn select_next_pattern(&mut self, available: &[PatternKind]) -> Option<PatternKind> {
        let candidates: Vec<PatternKind> = available
            .iter()
            .copied()
            .filter(|kind| self.pattern_registry.contains(*kind))
            .filter(|kind| !self.patterns.iter().any(|p| p.kind() == *kind))
            .collect();
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[self.rng.random_range(0..candidates.len())])
    }

    /// Build a weapon and activate it against the current live hazards
    pub fn activate_weapon(&mut self, kind: WeaponKind) -> Result<WeaponHandle, SimError> {
        let mut weapon = match self.weapon_registry.create(kind) {
            Ok(weapon) => weapon,
            Err(err) => {
                log::warn!("Cannot activate weapon: {err}");
                return Err(err);
            }
        };
        let handle = WeaponHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);

        let mut hazards = live_refs(&mut self.patterns);
        weapon.activate(&self.player, &mut hazards);
        log::info!("Weapon {} activated ({} live hazards)", kind.as_str(), hazards.len());

        self.weapons.push(ActiveWeapon { handle, weapon });
        self.events.push(SimEvent::WeaponActivated { handle, kind });
        Ok(handle)
    }

    /// New arena size, applied at the start of the next tick. Unusable sizes
    /// are ignored.
    pub fn resize(&mut self, bounds: Bounds) {
        if bounds.is_valid() {
            self.pending_bounds = Some(bounds);
        } else {
            log::warn!("Ignoring invalid arena size {}x{}", bounds.width, bounds.height);
        }
    }

    /// Take every event produced since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop every pattern, weapon and pickup and start over with the same
    /// settings and registries. The RNG carries on from where it was.
    pub fn restart(&mut self) {
        for pattern in &mut self.patterns {
            pattern.clear();
        }
        self.patterns.clear();
        for active in &mut self.weapons {
            active.weapon.clear();
        }
        self.weapons.clear();
        self.pickups.clear();
        self.grid.rebuild(std::iter::empty());
        self.player = Player::new(self.bounds.center());
        self.phase = Phase::Playing;
        self.scoring = Scoring::new();
        self.pattern_timer_ms = self.settings.first_pattern_delay_ms;
        self.idle_ms = 0.0;
        self.events.clear();
        log::info!("Run restarted");
    }
}

/// Mutable references to every live hazard of every pattern
pub(crate) fn live_refs(patterns: &mut [Box<dyn Pattern>]) -> Vec<&mut Hazard> {
    patterns
        .iter_mut()
        .flat_map(|p| p.core_mut().live_mut())
        .collect()
}
